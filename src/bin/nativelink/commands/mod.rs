//! Command implementations

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::cli::SelectArgs;
use nativelink::builder::toolchain::default_family;
use nativelink::core::Manifest;
use nativelink::util::GlobalContext;
use nativelink::FamilyId;

pub mod args;
pub mod completions;
pub mod families;
pub mod libs;

/// A loaded manifest with its family and properties chosen.
pub struct Project {
    pub ctx: GlobalContext,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub family: FamilyId,
    /// Manifest properties overlaid with `-D` definitions
    pub props: BTreeMap<String, String>,
}

impl Project {
    pub fn load(manifest_path: Option<PathBuf>, select: &SelectArgs) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let manifest_path = match manifest_path {
            Some(path) if path.is_relative() => ctx.cwd().join(path),
            Some(path) => path,
            None => ctx.find_manifest()?,
        };
        // Config next to an explicit manifest wins over the cwd's.
        let ctx = match manifest_path.parent() {
            Some(root) if root != ctx.cwd() => GlobalContext::with_cwd(root.to_path_buf()),
            _ => ctx,
        };

        let manifest = Manifest::load(&manifest_path)?;
        let family = default_family(
            select.family.or(manifest.toolchain.family),
            ctx.config().toolchain.family,
        );

        let mut props = manifest.properties.clone();
        for define in &select.defines {
            let (name, value) = parse_define(define)?;
            props.insert(name, value);
        }

        Ok(Project {
            ctx,
            manifest_path,
            manifest,
            family,
            props,
        })
    }
}

/// Parse `name` or `name=value`. A bare name defines an empty value.
pub fn parse_define(define: &str) -> Result<(String, String)> {
    let (name, value) = define.split_once('=').unwrap_or((define, ""));
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("invalid property definition `{}`: missing name", define);
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define() {
        assert_eq!(
            parse_define("debug").unwrap(),
            ("debug".to_string(), String::new())
        );
        assert_eq!(
            parse_define("arch=x64").unwrap(),
            ("arch".to_string(), "x64".to_string())
        );
        assert_eq!(
            parse_define("opt=a=b").unwrap(),
            ("opt".to_string(), "a=b".to_string())
        );
        assert!(parse_define("=1").is_err());
    }
}
