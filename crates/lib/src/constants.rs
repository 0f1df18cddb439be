//! Constants used throughout the zobject library.
//!
//! Well-known object identifiers (`Z<n>`) and field keys (`Z<n>K<m>`) of the
//! built-in types, plus the reserved namespace names of a [`Document`].
//!
//! [`Document`]: crate::model::Document

/// Namespace holding the object being edited.
pub const NS_MAIN: &str = "main";

/// Namespace holding a pending function call.
pub const NS_CALL: &str = "call";

/// Namespace holding the result of the last evaluated function call.
pub const NS_RESPONSE: &str = "response";

/// Placeholder identifier of an object that has not been persisted yet.
pub const NEW_OBJECT_ID: &str = "Z0";

// Type tag key carried by every tagged composite.
pub const Z_OBJECT_TYPE: &str = "Z1K1";

// Built-in types
pub const Z_OBJECT: &str = "Z1";
pub const Z_PERSISTENT_OBJECT: &str = "Z2";
pub const Z_KEY: &str = "Z3";
pub const Z_TYPE: &str = "Z4";
pub const Z_STRING: &str = "Z6";
pub const Z_FUNCTION_CALL: &str = "Z7";
pub const Z_FUNCTION: &str = "Z8";
pub const Z_REFERENCE: &str = "Z9";
pub const Z_MONOLINGUAL_STRING: &str = "Z11";
pub const Z_MULTILINGUAL_STRING: &str = "Z12";
pub const Z_IMPLEMENTATION: &str = "Z14";
pub const Z_CODE: &str = "Z16";
pub const Z_ARGUMENT: &str = "Z17";
pub const Z_ARGUMENT_REFERENCE: &str = "Z18";
pub const Z_TESTER: &str = "Z20";
pub const Z_MONOLINGUAL_STRINGSET: &str = "Z31";
pub const Z_MULTILINGUAL_STRINGSET: &str = "Z32";
pub const Z_BOOLEAN: &str = "Z40";
pub const Z_BOOLEAN_TRUE: &str = "Z41";
pub const Z_BOOLEAN_FALSE: &str = "Z42";
pub const Z_SERIALISER: &str = "Z46";
pub const Z_NATURAL_LANGUAGE: &str = "Z60";
pub const Z_PROGRAMMING_LANGUAGE: &str = "Z61";
pub const Z_DESERIALISER: &str = "Z64";
pub const Z_TYPED_LIST: &str = "Z881";
pub const Z_TYPED_PAIR: &str = "Z882";
pub const Z_TYPED_MAP: &str = "Z883";
pub const Z_LANG_EN: &str = "Z1002";

// Persistent object
pub const Z_PERSISTENT_OBJECT_ID: &str = "Z2K1";
pub const Z_PERSISTENT_OBJECT_VALUE: &str = "Z2K2";
pub const Z_PERSISTENT_OBJECT_LABEL: &str = "Z2K3";
pub const Z_PERSISTENT_OBJECT_ALIASES: &str = "Z2K4";
pub const Z_PERSISTENT_OBJECT_DESCRIPTION: &str = "Z2K5";

// Key
pub const Z_KEY_TYPE: &str = "Z3K1";
pub const Z_KEY_ID: &str = "Z3K2";
pub const Z_KEY_LABEL: &str = "Z3K3";
pub const Z_KEY_IS_IDENTITY: &str = "Z3K4";

// Type
pub const Z_TYPE_IDENTITY: &str = "Z4K1";
pub const Z_TYPE_KEYS: &str = "Z4K2";
pub const Z_TYPE_VALIDATOR: &str = "Z4K3";
pub const Z_TYPE_EQUALITY: &str = "Z4K4";
pub const Z_TYPE_RENDERER: &str = "Z4K5";
pub const Z_TYPE_PARSER: &str = "Z4K6";
pub const Z_TYPE_SERIALISERS: &str = "Z4K7";
pub const Z_TYPE_DESERIALISERS: &str = "Z4K8";

/// Type-function keys that submission drops when left unset.
pub const Z_TYPE_FUNCTION_KEYS: [&str; 4] = [
    Z_TYPE_VALIDATOR,
    Z_TYPE_EQUALITY,
    Z_TYPE_RENDERER,
    Z_TYPE_PARSER,
];

// Terminal keys: their values stay raw text in normalized form.
pub const Z_STRING_VALUE: &str = "Z6K1";
pub const Z_REFERENCE_ID: &str = "Z9K1";

// Function call
pub const Z_FUNCTION_CALL_FUNCTION: &str = "Z7K1";

// Function
pub const Z_FUNCTION_ARGUMENTS: &str = "Z8K1";
pub const Z_FUNCTION_RETURN_TYPE: &str = "Z8K2";
pub const Z_FUNCTION_TESTERS: &str = "Z8K3";
pub const Z_FUNCTION_IMPLEMENTATIONS: &str = "Z8K4";
pub const Z_FUNCTION_IDENTITY: &str = "Z8K5";

// Monolingual / multilingual text
pub const Z_MONOLINGUAL_STRING_LANGUAGE: &str = "Z11K1";
pub const Z_MONOLINGUAL_STRING_VALUE: &str = "Z11K2";
pub const Z_MULTILINGUAL_STRING_VALUE: &str = "Z12K1";

// Implementation
pub const Z_IMPLEMENTATION_FUNCTION: &str = "Z14K1";
pub const Z_IMPLEMENTATION_COMPOSITION: &str = "Z14K2";
pub const Z_IMPLEMENTATION_CODE: &str = "Z14K3";

// Code
pub const Z_CODE_LANGUAGE: &str = "Z16K1";
pub const Z_CODE_CODE: &str = "Z16K2";

// Argument declaration / reference
pub const Z_ARGUMENT_TYPE: &str = "Z17K1";
pub const Z_ARGUMENT_KEY: &str = "Z17K2";
pub const Z_ARGUMENT_LABEL: &str = "Z17K3";
pub const Z_ARGUMENT_REFERENCE_KEY: &str = "Z18K1";

// Tester
pub const Z_TESTER_FUNCTION: &str = "Z20K1";
pub const Z_TESTER_CALL: &str = "Z20K2";
pub const Z_TESTER_VALIDATION: &str = "Z20K3";

// Monolingual / multilingual stringset
pub const Z_MONOLINGUAL_STRINGSET_LANGUAGE: &str = "Z31K1";
pub const Z_MONOLINGUAL_STRINGSET_VALUE: &str = "Z31K2";
pub const Z_MULTILINGUAL_STRINGSET_VALUE: &str = "Z32K1";

// Boolean
pub const Z_BOOLEAN_IDENTITY: &str = "Z40K1";

// Generic constructors
pub const Z_TYPED_LIST_TYPE: &str = "Z881K1";
pub const Z_TYPED_PAIR_TYPE1: &str = "Z882K1";
pub const Z_TYPED_PAIR_TYPE2: &str = "Z882K2";
pub const Z_TYPED_MAP_TYPE1: &str = "Z883K1";
pub const Z_TYPED_MAP_TYPE2: &str = "Z883K2";

// Local keys of typed pairs and typed maps
pub const K1: &str = "K1";
pub const K2: &str = "K2";

/// Types edited by reference unless a literal instance is requested.
pub const DEFAULT_LINKED_TYPES: [&str; 8] = [
    Z_NATURAL_LANGUAGE,
    Z_PROGRAMMING_LANGUAGE,
    "Z6001",
    "Z6002",
    "Z6003",
    "Z6004",
    "Z6005",
    "Z6006",
];
