//! Command line shared by the desktop and terminal hosts.

use std::path::PathBuf;

use clap::Parser;

use crate::catalog::{self, Catalog};
use crate::error::CatalogError;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about = "Stacked half-pie loop menu")]
pub struct HostArgs {
    /// Catalog file (TOML) or folder of loops; the built-in sample menu
    /// when omitted
    pub catalog: Option<PathBuf>,
    /// Menu settings file; a missing file means defaults
    #[arg(long, env = "HALFPIE_CONFIG", default_value = "halfpie.toml")]
    pub config: PathBuf,
}

impl HostArgs {
    /// Menu named on the command line, or the sample menu.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => catalog::load_menu(path),
            None => catalog::sample_catalog(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = HostArgs::try_parse_from(["halfpie"]).unwrap();
        assert_eq!(args.catalog, None);
        assert_eq!(args.config, PathBuf::from("halfpie.toml"));
        assert_eq!(args.load_catalog().unwrap().tree.node_count(), 13);
    }

    #[test]
    fn test_catalog_and_config() {
        let args = HostArgs::try_parse_from(["halfpie", "loops", "--config", "menu.toml"]).unwrap();
        assert_eq!(args.catalog, Some(PathBuf::from("loops")));
        assert_eq!(args.config, PathBuf::from("menu.toml"));
    }

    #[test]
    fn test_help_is_not_a_catalog() {
        let err = HostArgs::try_parse_from(["halfpie", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
