pub mod plagiarism;
pub mod word_cloud;

pub use plagiarism::{PlagiarismGroup, detect, group_by_hash};
pub use word_cloud::{QuickChartRenderer, RenderError, WordCloudRenderer};
