pub mod candidates;
pub mod extensions;
pub mod generate;
pub mod resolve;

pub use candidates::*;
pub use extensions::*;
pub use generate::*;
pub use resolve::*;

use clap::ValueEnum;
use overlay_core::ResolverFlavor;

/// Resolver flavor as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FlavorArg {
    /// Any `*/` import; extensions searched under overrides/ then src/
    #[default]
    Overrides,
    /// Only `*/setup-app` and `*/setup-server`, at the extension root
    AppExtension,
}

impl From<FlavorArg> for ResolverFlavor {
    fn from(flavor: FlavorArg) -> Self {
        match flavor {
            FlavorArg::Overrides => ResolverFlavor::Overrides,
            FlavorArg::AppExtension => ResolverFlavor::AppExtension,
        }
    }
}
