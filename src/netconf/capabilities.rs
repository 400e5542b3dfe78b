use std::fmt;

/// Substring markers inside advertised NETCONF capability URIs
const CANDIDATE_MARKER: &str = ":candidate";
const WRITABLE_RUNNING_MARKER: &str = ":writable-running";

/// Typed view of the capability set advertised in the server hello.
/// Parsed once per session so the rest of the code never string-matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub candidate: bool,
    pub writable_running: bool,
}

impl Capabilities {
    pub fn from_advertised<S: AsRef<str>>(advertised: &[S]) -> Self {
        let mut caps = Self::default();
        for uri in advertised {
            let uri = uri.as_ref();
            if uri.contains(CANDIDATE_MARKER) {
                caps.candidate = true;
            }
            if uri.contains(WRITABLE_RUNNING_MARKER) {
                caps.writable_running = true;
            }
        }
        caps
    }
}

/// Commit target datastore for edit-config operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datastore {
    Candidate,
    Running,
}

impl Datastore {
    pub fn as_str(&self) -> &'static str {
        match self {
            Datastore::Candidate => "candidate",
            Datastore::Running => "running",
        }
    }
}

impl fmt::Display for Datastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of datastore negotiation for one session
#[derive(Debug, Clone, Copy)]
pub struct Negotiation {
    pub support: Capabilities,
    pub target: Datastore,
}

impl Negotiation {
    /// Staged mode: each edit goes to the candidate store and is committed
    /// individually.
    pub fn uses_candidate(&self) -> bool {
        self.target == Datastore::Candidate
    }
}

/// Pick the commit target from the advertised capability set. There is no
/// error path: a device without candidate support simply gets direct edits
/// against the running store.
pub fn negotiate<S: AsRef<str>>(host: &str, advertised: &[S]) -> Negotiation {
    let support = Capabilities::from_advertised(advertised);
    let target = if support.candidate {
        Datastore::Candidate
    } else {
        Datastore::Running
    };

    match target {
        Datastore::Candidate => {
            tracing::info!("{}: using target datastore 'candidate'", host);
        }
        Datastore::Running => {
            tracing::warn!(
                "{}: candidate not supported, using 'running' as target datastore",
                host
            );
            if !support.writable_running {
                tracing::warn!(
                    "{}: device advertises neither candidate nor writable-running, edits may be rejected",
                    host
                );
            }
        }
    }

    Negotiation { support, target }
}
