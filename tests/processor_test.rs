use std::fs;
use std::path::Path;

use charmgen::config::{derive_names, template_context};
use charmgen::error::{Error, Result};
use charmgen::fetcher::Fetcher;
use charmgen::processor::{create_charm, render_file};
use charmgen::renderer::MiniJinjaRenderer;
use tempfile::TempDir;

/// Fetcher that materializes a canned template tree instead of cloning
/// over the network.
struct FakeFetcher;

impl Fetcher for FakeFetcher {
    fn fetch(&self, _repo: &str, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir.join("reactive"))?;
        fs::create_dir_all(output_dir.join("lib"))?;
        fs::create_dir_all(output_dir.join(".git"))?;

        fs::write(output_dir.join(".git").join("config"), "[core]")?;
        fs::write(output_dir.join("README.md"), "template readme")?;
        fs::write(output_dir.join(".gitmodules"), "[submodule]")?;
        fs::write(
            output_dir.join("reactive").join("handlers.py"),
            "from lib.{{ libfile }} import {{ libclass }}",
        )?;
        fs::write(
            output_dir.join("lib").join("lib.py"),
            "class {{ libclass }}:\n    pass",
        )?;
        fs::write(
            output_dir.join("metadata.yaml"),
            "name: {{ metadata.package }}\nmaintainer: {{ author }}",
        )?;
        // Never rendered, so the broken expression must not fail the run.
        fs::write(output_dir.join("Makefile"), "all:\n\t{% broken")?;
        fs::write(output_dir.join(".gitignore"), "*.pyc\n{{ untouched }}")?;
        fs::write(output_dir.join("foo.pyc"), "{{ bytecode }}")?;

        Ok(())
    }
}

fn example_config() -> serde_json::Value {
    serde_json::json!({
        "metadata": { "package": "Example-SVC" },
        "author": "A. Developer"
    })
}

fn generate() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let engine = MiniJinjaRenderer::new();

    create_charm(&FakeFetcher, &engine, &example_config(), temp_dir.path()).unwrap();
    temp_dir
}

fn tree_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_create_charm_produces_exactly_the_expected_tree() {
    let temp_dir = generate();

    // Placeholders are relocated, repository metadata is stripped, and no
    // temporary or backup file is left behind anywhere in the tree.
    assert_eq!(
        tree_files(temp_dir.path()),
        vec![
            ".gitignore",
            "Makefile",
            "foo.pyc",
            "lib/lib_example_svc.py",
            "metadata.yaml",
            "reactive/example_svc.py",
        ]
    );
}

#[test]
fn test_create_charm_renders_derived_bindings() {
    let temp_dir = generate();

    let handlers =
        fs::read_to_string(temp_dir.path().join("reactive").join("example_svc.py"))
            .unwrap();
    assert_eq!(handlers, "from lib.lib_example_svc import ExamplesvcHelper");

    let lib =
        fs::read_to_string(temp_dir.path().join("lib").join("lib_example_svc.py"))
            .unwrap();
    assert_eq!(lib, "class ExamplesvcHelper:\n    pass");
}

#[test]
fn test_create_charm_exposes_caller_keys_and_lowercased_package() {
    let temp_dir = generate();

    let metadata = fs::read_to_string(temp_dir.path().join("metadata.yaml")).unwrap();
    assert_eq!(metadata, "name: example-svc\nmaintainer: A. Developer");
}

#[test]
fn test_create_charm_skips_protected_files() {
    let temp_dir = generate();

    let makefile = fs::read_to_string(temp_dir.path().join("Makefile")).unwrap();
    assert_eq!(makefile, "all:\n\t{% broken");

    let gitignore = fs::read_to_string(temp_dir.path().join(".gitignore")).unwrap();
    assert_eq!(gitignore, "*.pyc\n{{ untouched }}");

    let bytecode = fs::read_to_string(temp_dir.path().join("foo.pyc")).unwrap();
    assert_eq!(bytecode, "{{ bytecode }}");
}

#[test]
fn test_create_charm_missing_package_fails() {
    let temp_dir = TempDir::new().unwrap();
    let engine = MiniJinjaRenderer::new();
    let config = serde_json::json!({ "metadata": {} });

    let result = create_charm(&FakeFetcher, &engine, &config, temp_dir.path());
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_create_charm_aborts_on_malformed_template() {
    struct BrokenTemplateFetcher;

    impl Fetcher for BrokenTemplateFetcher {
        fn fetch(&self, _repo: &str, output_dir: &Path) -> Result<()> {
            fs::create_dir_all(output_dir.join("reactive"))?;
            fs::create_dir_all(output_dir.join("lib"))?;
            fs::write(output_dir.join("reactive").join("handlers.py"), "handlers")?;
            fs::write(output_dir.join("lib").join("lib.py"), "library")?;
            fs::write(output_dir.join("config.yaml"), "{% endfor %}")?;
            Ok(())
        }
    }

    let temp_dir = TempDir::new().unwrap();
    let engine = MiniJinjaRenderer::new();

    let result =
        create_charm(&BrokenTemplateFetcher, &engine, &example_config(), temp_dir.path());
    assert!(matches!(result, Err(Error::MinijinjaError(_))));
}

#[test]
fn test_render_file_is_stable_once_content_stabilizes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hooks.py");
    fs::write(&path, "fixture = \"{{ fixture }}\"").unwrap();

    let engine = MiniJinjaRenderer::new();
    let names = derive_names("example-svc");
    let context = template_context(&example_config(), &names).unwrap();

    render_file(&engine, &context, &path).unwrap();
    let first = fs::read_to_string(&path).unwrap();
    assert_eq!(first, "fixture = \"examplesvc\"");

    render_file(&engine, &context, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[cfg(unix)]
#[test]
fn test_render_file_preserves_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("deploy.sh");
    fs::write(&path, "#!/bin/sh\necho {{ fixture }}").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    let engine = MiniJinjaRenderer::new();
    let names = derive_names("example-svc");
    let context = template_context(&example_config(), &names).unwrap();

    render_file(&engine, &context, &path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "#!/bin/sh\necho examplesvc"
    );
}

#[cfg(unix)]
#[test]
fn test_render_file_leaves_symlinks_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("target.py");
    let link = temp_dir.path().join("link.py");
    fs::write(&target, "value = \"{{ fixture }}\"").unwrap();
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let engine = MiniJinjaRenderer::new();
    let names = derive_names("example-svc");
    let context = template_context(&example_config(), &names).unwrap();

    render_file(&engine, &context, &link).unwrap();

    // The link is still a link and its target was not rewritten through it.
    let link_metadata = fs::symlink_metadata(&link).unwrap();
    assert!(link_metadata.file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), target);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "value = \"{{ fixture }}\""
    );
}
