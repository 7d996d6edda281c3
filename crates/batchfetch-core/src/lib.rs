//! batchfetch core: fetch a list of URLs on a bounded worker pool and save
//! each body to `{index}.html`.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod fetch;
pub mod logging;
pub mod outcome;
pub mod persist;
pub mod pool;
pub mod report;
pub mod task;
pub mod worker;

pub use dispatcher::{DispatchSettings, Dispatcher};
pub use error::{FetchError, FetchErrorKind, PersistError, RunError, TaskFailure};
pub use events::{EventSink, Level, RecordingSink, TracingSink};
pub use fetch::{CurlFetcher, Fetched, Fetcher};
pub use outcome::{RunSummary, TaskOutcome};
pub use persist::{FsPersister, Persister};
pub use task::Task;
