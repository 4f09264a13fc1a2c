//! forge-detect
//!
//! 画像改ざん検出ワークフローのシミュレータ。ステージを順に進め、
//! 乱数から一貫した検出レポートを合成する。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;

pub use forge_detect_common as common;
