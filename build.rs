// build.rs

use glob::glob;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A fixture file discovered under `data/`.
#[derive(Debug)]
struct FixtureFile {
    pub name: String,
    pub path: PathBuf,
}

/// Discovers all `.gep` fixture files in the `data/` directory.
fn discover_fixtures(manifest_dir: &Path) -> Vec<FixtureFile> {
    let pattern = manifest_dir.join("data").join("*.gep");
    glob(&pattern.to_string_lossy())
        .expect("Failed to read glob pattern")
        .filter_map(Result::ok)
        .filter_map(|path| {
            let name = path
                .file_stem()?
                .to_string_lossy()
                .replace(['-', '.', ' '], "_");
            Some(FixtureFile { name, path })
        })
        .collect()
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    println!("cargo:rerun-if-changed=data");

    // Get the Cargo output directory where we will place the generated code.
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("fixture_tests.rs");
    let mut file = BufWriter::new(File::create(&dest_path).unwrap());

    let mut fixtures = discover_fixtures(&manifest_dir);
    fixtures.sort_by(|a, b| a.name.cmp(&b.name));

    // Generate a separate `#[test]` function for each fixture.
    for fixture in fixtures {
        println!("cargo:rerun-if-changed={}", fixture.path.display());
        let path_str = fixture.path.to_string_lossy();

        writeln!(
            file,
            r#"
#[test]
fn fixture_{name}() -> anyhow::Result<()> {{
    run_fixture("{name}", std::path::Path::new("{path}"))
}}
"#,
            name = fixture.name,
            path = path_str.escape_default()
        )
        .unwrap();
    }
}
