use std::path::{Path, PathBuf};

use crate::data::DataManager;
use crate::tool::{Parameters, Tool};

/// A temporary directory, removed on `drop`.
pub struct TempFixture {
    temp_dir: tempfile::TempDir,
}

impl TempFixture {
    pub fn empty() -> Self {
        Self {
            temp_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Creates a temporary directory holding an empty file for each of `names`.
    pub fn with_files(names: &[&str]) -> Self {
        let fixture = Self::empty();
        for name in names {
            fixture.touch(name);
        }
        fixture
    }

    pub fn touch(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl AsRef<Path> for TempFixture {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

type Body = Box<dyn FnMut(&mut Parameters, &mut DataManager) -> bool>;

/// A tool whose algorithm is a closure over its own parameters.
pub struct ScriptedTool {
    name: String,
    parameters: Parameters,
    body: Body,
    /// Returned by `on_before_execution`.
    pub proceed: bool,
}

impl ScriptedTool {
    pub fn new<F>(name: &str, parameters: Parameters, body: F) -> Self
    where
        F: FnMut(&mut Parameters, &mut DataManager) -> bool + 'static,
    {
        ScriptedTool {
            name: name.to_string(),
            parameters,
            body: Box::new(body),
            proceed: true,
        }
    }

    pub fn boxed(self) -> Box<dyn Tool> {
        Box::new(self)
    }
}

impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn on_execute(&mut self, data: &mut DataManager) -> bool {
        (self.body)(&mut self.parameters, data)
    }

    fn on_before_execution(&mut self) -> bool {
        self.proceed
    }
}

/// Assert numerical difference between two expressions is less than
/// 64-bit machine epsilon or a specified epsilon.
///
/// ```rust, ignore
/// assert_near!(PI / E, 1.1557273497909217);
/// assert_near!(PI / E, 1.15572734, epsilon = 1e-8);
/// ```
#[macro_export]
macro_rules! assert_near {
    ($left:expr, $right:expr) => {
        assert_near!($left, $right, epsilon = f64::EPSILON)
    };
    ($left:expr, $right:expr, epsilon = $ep:expr) => {
        assert!(
            ($left - $right).abs() < $ep,
            "|{} - {}| = {} is greater than epsilon {:.4e}",
            $left,
            $right,
            ($left - $right).abs(),
            $ep
        )
    };
    ($left:expr, $right:expr, epsilon = $ep:expr, field = $field:expr) => {
        assert!(
            ($left - $right).abs() < $ep,
            "field {}: |{} - {}| = {} is greater than epsilon {:.4e}",
            $field,
            $left,
            $right,
            ($left - $right).abs(),
            $ep
        )
    };
    // Pseudo-specialization
    (Extent, $left:expr, $right:expr, epsilon = $ep:expr) => {
        assert_near!($left.xmin, $right.xmin, epsilon = $ep, field = "xmin");
        assert_near!($left.xmax, $right.xmax, epsilon = $ep, field = "xmax");
        assert_near!($left.ymin, $right.ymin, epsilon = $ep, field = "ymin");
        assert_near!($left.ymax, $right.ymax, epsilon = $ep, field = "ymax");
    };
}
