mod common;
mod finalize;
mod report;
