use behave_core::TestBody;
use std::fmt;

use super::assertions::Assertion;

/// Registration style of a scenario test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Test,
    Ignored,
    Describe { subject: String },
    Feature { feature: String },
    When { condition: String },
}

/// All possible actions in a test scenario
pub enum ScenarioStep {
    // Registration
    Register {
        style: Style,
        name: String,
        tags: Vec<String>,
        body: TestBody,
    },

    // Suite-level fixtures
    TempDir,
    Recording {
        name: String,
    },

    // Execution
    Run,

    // Assertions (run the suite first if it has not run yet)
    Assert {
        assertion: Assertion,
    },
}

impl fmt::Debug for ScenarioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register {
                style, name, tags, ..
            } => write!(
                f,
                "Register {{ style: {:?}, name: {:?}, tags: {:?} }}",
                style, name, tags
            ),
            Self::TempDir => write!(f, "TempDir"),
            Self::Recording { name } => write!(f, "Recording {{ name: {:?} }}", name),
            Self::Run => write!(f, "Run"),
            Self::Assert { assertion } => write!(f, "Assert {{ assertion: {:?} }}", assertion),
        }
    }
}
