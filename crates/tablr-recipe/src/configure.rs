//! Platform pruning of the option set.

use tracing::debug;

use crate::options::{OptionDecl, OptionSet};
use crate::settings::PlatformSettings;

/// Remove every option that is unavailable on the target platform.
///
/// With the published schemas this drops `fPIC` when the os is Windows and
/// leaves the set untouched everywhere else. Options already missing from
/// the set are skipped, so the function is idempotent and never fails.
pub fn configure_options(
    decls: &[OptionDecl],
    settings: &PlatformSettings,
    mut options: OptionSet,
) -> OptionSet {
    for decl in decls {
        if decl.availability.supported_on(settings) {
            continue;
        }
        if let Some(previous) = options.remove(decl.name) {
            debug!(
                option = decl.name,
                previous,
                os = settings.os.as_ref().map(|o| o.as_str()),
                "option unavailable on target platform, removed"
            );
        }
    }
    options
}
