//! The `opal install` command.
//!
//! Each requested spec becomes an independent install root. Roots run
//! concurrently and fail independently; the process exits non-zero when any
//! root failed, after every root has concluded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use futures::future::join_all;

use opal_core::install::{InstallOptions, Installer};
use opal_core::remotes::RemoteList;
use opal_core::Reporter;
use opal_schema::{MANIFEST_FILE, Manifest, PackageSpec, Version};

use crate::ui::ConsoleReporter;

/// Arguments for one invocation of `opal install`.
#[derive(Debug)]
pub struct InstallArgs {
    pub packages: Vec<String>,
    pub out: PathBuf,
    pub force: bool,
    pub remotes: Vec<String>,
    pub proxy: Option<String>,
    pub concurrency: usize,
    pub dev: bool,
    pub quiet: bool,
}

/// Resolve the install roots and drive them all to completion.
pub async fn install(args: InstallArgs) -> Result<()> {
    let specs = if args.packages.is_empty() {
        project_dependencies(Path::new(MANIFEST_FILE), args.dev)?
    } else {
        args.packages
            .iter()
            .map(|raw| PackageSpec::parse(raw))
            .collect()
    };

    if specs.is_empty() {
        println!("nothing to install");
        return Ok(());
    }

    let options = InstallOptions {
        dest: args.out,
        remotes: RemoteList::new(args.remotes),
        force: args.force,
        proxy: args.proxy,
        auth: std::collections::HashMap::new(),
        concurrency: args.concurrency,
    };
    let reporter = Arc::new(ConsoleReporter::new(args.quiet));
    let installer = Installer::new(options, reporter.clone())
        .context("failed to initialize the HTTP transport")?;

    let roots = specs
        .into_iter()
        .map(|spec| installer.request(spec.name, spec.version).run());
    let results = join_all(roots).await;

    let failures = results
        .iter()
        .filter_map(|result| result.as_ref().err())
        .inspect(|err| reporter.error(&err.to_string()))
        .count();

    if failures > 0 {
        anyhow::bail!("{failures} component(s) failed to install");
    }
    reporter.info("complete");
    Ok(())
}

/// Read the install roots from the project's own descriptor.
fn project_dependencies(path: &Path, dev: bool) -> Result<Vec<PackageSpec>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("no packages given and {} is not readable", path.display()))?;
    let manifest =
        Manifest::from_json(&text).with_context(|| format!("failed to parse {}", path.display()))?;

    let mut specs = Vec::new();
    collect(&mut specs, manifest.dependencies.as_ref());
    if dev {
        collect(&mut specs, manifest.development.as_ref());
    }
    Ok(specs)
}

fn collect(specs: &mut Vec<PackageSpec>, deps: Option<&BTreeMap<String, String>>) {
    if let Some(deps) = deps {
        for (name, version) in deps {
            specs.push(PackageSpec {
                name: name.clone(),
                version: Version::new(version.clone()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_dependencies_reads_runtime_deps() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("component.json");
        std::fs::write(
            &path,
            r#"{
                "dependencies": {"component/tip": "*", "component/popover": "1.0.0"},
                "development": {"component/assert": "*"}
            }"#,
        )
        .unwrap();

        let specs = project_dependencies(&path, false).unwrap();
        let rendered: Vec<String> = specs.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["component/popover@1.0.0", "component/tip@master"]
        );
    }

    #[test]
    fn test_project_dependencies_includes_dev_on_request() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("component.json");
        std::fs::write(
            &path,
            r#"{
                "dependencies": {"component/tip": "*"},
                "development": {"component/assert": "*"}
            }"#,
        )
        .unwrap();

        let specs = project_dependencies(&path, true).unwrap();
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().any(|s| s.name == "component/assert"));
    }

    #[test]
    fn test_missing_project_manifest_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("component.json");
        assert!(project_dependencies(&path, false).is_err());
    }
}
