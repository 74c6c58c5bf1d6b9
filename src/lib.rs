pub mod analyzers;
pub mod dashboard;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
