/*! Integration tests for zobject.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - convert: Round trips between canonical and normalized form
 * - factory: Scaffolding of builtin, generic and recursive types
 * - store: Path-based reads and edits, list and local key invariants
 * - submit: Normalization, validation and the submission flow
 * - services: Background fetching and file-backed persistence
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("zobject=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod convert;
mod factory;
mod helpers;
mod services;
mod store;
mod submit;
