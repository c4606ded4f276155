//! dnscmd provider implementation

pub mod classifier;
pub mod executor;
pub mod record;
pub mod zones;


pub use classifier::{OutputMarkers, ResponseClassifier};
pub use executor::{
    COMMAND_TIMEOUT, CommandLine, CommandOutput, CommandRunner, DnscmdExecutor, ProcessRunner,
};
pub use record::DnscmdRecord;
