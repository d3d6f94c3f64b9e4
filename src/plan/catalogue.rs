//! Remediation catalogue: which repository commands address which indicator

/// A catalogue entry, turned into a `RemediationStep` by the plan builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub title: &'static str,
    pub command: &'static str,
    pub rationale: &'static str,
    pub priority: u32,
}

/// Trigger recorded on every step of the fallback plan
pub const FALLBACK_TRIGGER: &str = "fallback";

const TYPECHECK: CatalogueEntry = CatalogueEntry {
    title: "Type check",
    command: "npm run typecheck",
    rationale: "Reproduce the TypeScript compiler errors locally before touching code.",
    priority: 4,
};

const MYPY: CatalogueEntry = CatalogueEntry {
    title: "Static type check (Python)",
    command: "mypy .",
    rationale: "mypy reported type errors; rerun it to get the full list with file positions.",
    priority: 4,
};

const LINT: CatalogueEntry = CatalogueEntry {
    title: "Lint check",
    command: "npm run lint",
    rationale: "The job failed on an annotated error; lint is the most common source of workflow annotations.",
    priority: 5,
};

const LINT_FIX: CatalogueEntry = CatalogueEntry {
    title: "Apply lint autofixes",
    command: "npm run lint -- --fix",
    rationale: "Many lint findings are mechanically fixable; apply them and review the diff.",
    priority: 6,
};

const PIP_INSTALL: CatalogueEntry = CatalogueEntry {
    title: "Reinstall Python dependencies",
    command: "pip install -r requirements.txt",
    rationale: "A module could not be imported, which usually means a missing or unpinned dependency.",
    priority: 7,
};

const NPM_CI: CatalogueEntry = CatalogueEntry {
    title: "Clean install dependencies",
    command: "npm ci",
    rationale: "Install exactly what the lockfile describes to rule out dependency drift.",
    priority: 8,
};

const NPM_BUILD: CatalogueEntry = CatalogueEntry {
    title: "Rebuild project",
    command: "npm run build",
    rationale: "Confirm the build succeeds against a clean dependency tree.",
    priority: 9,
};

const PYTEST_FIRST: CatalogueEntry = CatalogueEntry {
    title: "Reproduce first pytest failure",
    command: "pytest -x --maxfail=1 -q",
    rationale: "Stop at the first failing test to get a focused traceback.",
    priority: 10,
};

const PYTEST_LAST_FAILED: CatalogueEntry = CatalogueEntry {
    title: "Re-run last failures verbosely",
    command: "pytest --lf -vv",
    rationale: "Re-run only the tests that failed with verbose assertion output.",
    priority: 11,
};

const JEST_SERIAL: CatalogueEntry = CatalogueEntry {
    title: "Re-run Jest suite serially",
    command: "npm test -- --ci --runInBand",
    rationale: "Running in band removes worker interleaving and makes failures deterministic.",
    priority: 12,
};

const LARGER_HEAP: CatalogueEntry = CatalogueEntry {
    title: "Build with larger heap",
    command: "NODE_OPTIONS=--max-old-space-size=4096 npm run build",
    rationale: "The process ran out of memory; retry with a larger V8 heap to confirm.",
    priority: 13,
};

const OPEN_HANDLES: CatalogueEntry = CatalogueEntry {
    title: "Detect hanging handles",
    command: "npm test -- --ci --detectOpenHandles",
    rationale: "A step timed out; open handles are the usual reason a test run never exits.",
    priority: 14,
};

const DOCKER_NO_CACHE: CatalogueEntry = CatalogueEntry {
    title: "Rebuild image without cache",
    command: "docker build --no-cache --progress=plain .",
    rationale: "Rebuild from scratch with plain progress output to see the failing layer.",
    priority: 15,
};

const FALLBACK: [CatalogueEntry; 3] = [
    CatalogueEntry {
        title: "Lint and format check",
        command: "npm run lint && npm run format:check",
        rationale: "No specific failure was recognized; start with the cheapest repository checks.",
        priority: 1,
    },
    CatalogueEntry {
        title: "Full test run",
        command: "npm test",
        rationale: "Run the complete test suite to reproduce the failure locally.",
        priority: 2,
    },
    CatalogueEntry {
        title: "Static type check",
        command: "npm run typecheck",
        rationale: "Type errors often surface as unrelated-looking CI failures.",
        priority: 3,
    },
];

/// Looks up the remediation entries for an indicator.
///
/// Returns `None` for indicators without a catalogue mapping (`exit_code`,
/// `generic_error` and anything unknown).
pub fn entries_for(indicator: &str) -> Option<&'static [CatalogueEntry]> {
    let entries: &'static [CatalogueEntry] = match indicator {
        "ts_errors" => &[TYPECHECK],
        "mypy_errors" => &[MYPY],
        "gha_error" => &[LINT, LINT_FIX],
        "eslint_errors" => &[LINT, LINT_FIX],
        "module_not_found" => &[PIP_INSTALL, NPM_CI],
        "npm_error" => &[NPM_CI, NPM_BUILD],
        "pytest_failures" => &[PYTEST_FIRST, PYTEST_LAST_FAILED],
        "python_traceback" => &[PYTEST_FIRST],
        "jest_failures" => &[JEST_SERIAL],
        "out_of_memory" => &[LARGER_HEAP],
        "timeout" => &[OPEN_HANDLES],
        "docker_errors" => &[DOCKER_NO_CACHE],
        _ => return None,
    };
    Some(entries)
}

/// Steps used when nothing in the log maps to a catalogue entry
pub fn fallback_entries() -> &'static [CatalogueEntry] {
    &FALLBACK
}
