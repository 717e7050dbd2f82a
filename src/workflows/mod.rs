pub mod onet;
pub mod pipeline;
pub mod scoring;
