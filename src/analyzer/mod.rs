pub mod version_analyzer;

pub use version_analyzer::{
    resolve, Analysis, MatchResult, NextVersion, Resolution, VersionAnalyzer,
};
