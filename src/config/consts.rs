/// Backend used when no default has been chosen, or the chosen one was unregistered
pub const INITIAL_BACKEND: &str = "local";
/// Name of the no-op backend
pub const DUMMY_BACKEND: &str = "dummy";
/// Directory under the working directory where the local backend keeps its runs
pub const ARTIFACTS_DIR: &str = "artifacts";
/// Pointer to the most recent run directory, inside the artifacts directory
pub const LATEST_LINK: &str = "latest";
/// Aggregate file receiving push item records, one JSON object per line
pub const PUSH_ITEMS_FILE: &str = "pushitems.jsonl";
/// chrono format for run directory names; fixed width so names sort by time
pub const RUN_DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
/// Upper bound on `-N` suffixes tried when a run directory name is taken
pub const MAX_RUN_DIR_SUFFIX: u32 = 999;
