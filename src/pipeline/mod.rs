pub mod engine;
pub mod sink;

pub use engine::{FlipPipeline, PipelineOutput};
pub use sink::{EventSink, NullSink, PipelineEvent, RecordingSink, RejectReason, Stage, TracingSink};
