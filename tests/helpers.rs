//! Shared test utilities for jurisdiction-bootstrap tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jurisdiction_bootstrap::error::Result;
use jurisdiction_bootstrap::{Installer, Transform, TransformError};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Test environment holding an extracted template tree.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Directory the template was extracted into
    pub base_dir: PathBuf,
    /// Template tree root
    pub root: PathBuf,
}

impl TestEnv {
    /// Template extracted as `openfisca-country-template/`.
    pub fn new() -> Self {
        Self::with_root_name("openfisca-country-template")
    }

    /// Template extracted under a custom directory name.
    pub fn with_root_name(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = fs::canonicalize(temp_dir.path()).expect("Failed to canonicalize temp dir");
        let root = base_dir.join(name);
        create_template_tree(&root);

        Self {
            _temp_dir: temp_dir,
            base_dir,
            root,
        }
    }

    /// A transform of this tree with default settings.
    pub fn transform(&self, name: &str) -> Transform {
        Transform::new(&self.root, name)
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

pub const SETUP_PY: &str = r#""""This file contains your country package's metadata and dependencies."""

from setuptools import find_packages, setup

setup(
    name="OpenFisca-Country-Template",
    version="7.1.5",
    author="OpenFisca Team",
    author_email="contact@openfisca.org",
    classifiers=[
        "Development Status :: 5 - Production/Stable",
        "License :: OSI Approved :: GNU Affero General Public License v3",
        "Operating System :: POSIX",
        "Programming Language :: Python",
        "Topic :: Scientific/Engineering :: Information Analysis",
    ],
    description="OpenFisca tax and benefit system for Country-Template",
    keywords="benefit microsimulation social tax",
    license="http://www.fsf.org/licensing/licenses/agpl-3.0.html",
    url="https://github.com/openfisca/country-template",
    include_package_data=True,
    install_requires=[
        "openfisca-core[web-api] >= 41.4.5, < 42.0",
    ],
    packages=find_packages(),
)
"#;

pub const README_MD: &str = "# OpenFisca Country-Template

This package contains the Country-Template tax and benefit system.

```sh
pip install openfisca-country_template
openfisca serve --country-package openfisca_country_template
```
";

pub const CONTRIBUTING_MD: &str = "# Contributing to Country-Template

Tests live in `openfisca_country_template/tests`.
";

pub const MAKEFILE: &str = "test:
\topenfisca test --country-package openfisca_country_template openfisca_country_template/tests
";

pub const INIT_PY: &str = "import os

from openfisca_core.taxbenefitsystems import TaxBenefitSystem

from openfisca_country_template import entities
from openfisca_country_template.situation_examples import couple

COUNTRY_DIR = os.path.dirname(os.path.abspath(__file__))


class CountryTaxBenefitSystem(TaxBenefitSystem):
    def __init__(self):
        super().__init__(entities.entities)
";

pub const BENEFITS_PY: &str = "from openfisca_core.periods import MONTH
from openfisca_core.variables import Variable

from openfisca_country_template.entities import Person


class basic_income(Variable):
    value_type = float
    entity = Person
    definition_period = MONTH
    label = \"Basic income provided to adults\"
";

pub const BASIC_INCOME_YAML: &str = "description: Amount of the basic income in Country-Template
values:
  2015-12-01:
    value: 600
";

pub const BENEFITS_TEST_YAML: &str = "- name: Basic income
  period: 2016-12
  input:
    age: 20
  output:
    basic_income: 600
";

/// Bytes that are not valid UTF-8 but embed the placeholder.
pub const BINARY_ASSET: &[u8] = b"\x89PNG\r\n\x1a\n\xff\xfecountry_template\x00";

/// A Latin-1 encoded Python module importing the package.
pub const LATIN1_MODULE: &[u8] = b"# caf\xe9\nfrom openfisca_country_template import entities\n";

/// Create an untransformed country template tree at `root`.
pub fn create_template_tree(root: &Path) {
    let files: &[(&str, &str)] = &[
        ("README.md", README_MD),
        ("setup.py", SETUP_PY),
        ("CONTRIBUTING.md", CONTRIBUTING_MD),
        ("Makefile", MAKEFILE),
        ("openfisca_country_template/__init__.py", INIT_PY),
        ("openfisca_country_template/entities.py", "from openfisca_core.entities import build_entity\n"),
        ("openfisca_country_template/variables/__init__.py", ""),
        ("openfisca_country_template/variables/benefits.py", BENEFITS_PY),
        (
            "openfisca_country_template/parameters/benefits/basic_income.yaml",
            BASIC_INCOME_YAML,
        ),
        ("openfisca_country_template/tests/benefits.yaml", BENEFITS_TEST_YAML),
        (
            "openfisca_country_template/situation_examples/__init__.py",
            "from openfisca_country_template.situation_examples.couple import couple\n",
        ),
        ("openfisca_country_template/.DS_Store", "Bud1 country_template"),
    ];

    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("fixture paths have parents"))
            .expect("Failed to create fixture dir");
        fs::write(&path, content).expect("Failed to write fixture file");
    }

    fs::write(
        root.join("openfisca_country_template/assets.bin"),
        BINARY_ASSET,
    )
    .expect("Failed to write binary fixture");
    fs::write(
        root.join("openfisca_country_template/variables/legacy.py"),
        LATIN1_MODULE,
    )
    .expect("Failed to write Latin-1 fixture");
}

/// Every file under `dir` with its content, keyed by path relative to `dir`.
pub fn snapshot_tree(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).expect("walk stays under dir").to_path_buf();
            let content = fs::read(e.path()).expect("Failed to read snapshot file");
            (rel, content)
        })
        .collect()
}

/// Count placeholder occurrences (any casing) across every file under
/// `dir`, text or not, skipping only `.DS_Store` sentinels.
pub fn count_placeholders(dir: &Path) -> usize {
    snapshot_tree(dir)
        .into_iter()
        .filter(|(rel, _)| !rel.ends_with(".DS_Store"))
        .map(|(_, bytes)| {
            ["country_template", "Country-Template"]
                .iter()
                .map(|needle| {
                    bytes
                        .windows(needle.len())
                        .filter(|window| *window == needle.as_bytes())
                        .count()
                })
                .sum::<usize>()
        })
        .sum()
}

/// Installer that records each project root it was asked to install.
#[derive(Default)]
pub struct RecordingInstaller {
    pub calls: RefCell<Vec<PathBuf>>,
}

impl Installer for RecordingInstaller {
    fn name(&self) -> &str {
        "recording"
    }

    fn install(&self, project_root: &Path) -> Result<()> {
        self.calls.borrow_mut().push(project_root.to_path_buf());
        Ok(())
    }
}

/// Installer that always fails the way a package manager would.
pub struct FailingInstaller;

impl Installer for FailingInstaller {
    fn name(&self) -> &str {
        "failing"
    }

    fn install(&self, project_root: &Path) -> Result<()> {
        Err(TransformError::InstallFailure {
            dir: project_root.to_path_buf(),
            message: "ERROR: Could not find a version that satisfies the requirement".to_string(),
        })
    }
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}

/// Assert that a file does not contain some content.
pub fn assert_file_lacks(path: &Path, unexpected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        !content.contains(unexpected),
        "File {} still contains {:?}",
        path.display(),
        unexpected
    );
}

/// Assert that a directory exists.
pub fn assert_dir_exists(path: &Path) {
    assert!(
        path.is_dir(),
        "Expected directory to exist: {}",
        path.display()
    );
}
