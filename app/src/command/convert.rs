use std::path::PathBuf;
use tracing::info;

use caselog_config::Config;
use caselog_core::{CaseProcessor, ExtractionConfig, FindingExtractor, ScoreWeights};
use caselog_io::{ValidationReport, export_to_json, read_csv_pairs, write_output_csv};

/// Inputs for the convert command.
pub struct ConvertInput {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub web_json: Option<PathBuf>,
    pub resident_id: Option<String>,
    pub program_info: Option<PathBuf>,
}

/// Strategy for converting CSV pair extracts to the case-log output format.
#[derive(Debug, Clone, Copy)]
pub struct ConvertStrategy;

impl super::CommandStrategy for ConvertStrategy {
    type Input = ConvertInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = match &input.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let extractor = FindingExtractor::new(ExtractionConfig {
            weights: ScoreWeights::default(),
            review_threshold: config.engine.review_threshold,
            context_window: config.engine.context_window,
        });
        let processor = CaseProcessor::with_defaults(extractor)?;

        let (mut records, orphans) = read_csv_pairs(&input.input_dir)?;
        if !orphans.is_empty() {
            info!(
                "Including {} standalone procedure record(s)",
                orphans.len()
            );
            records.extend(orphans);
        }

        if records.is_empty() {
            info!("Input directory contained no case rows");
            return Ok(());
        }

        let cases = processor.process_batch(&records);
        write_output_csv(
            &input.output,
            &cases,
            processor.review_threshold(),
            config.engine.default_year,
        )?;

        if let Some(report_path) = &input.report {
            let report = ValidationReport::new(&cases);
            report.save_report(report_path)?;
            let summary = report.summary();
            info!(
                "Validation report saved to {} ({} cases, {} with warnings, avg confidence {:.3})",
                report_path.display(),
                summary.total_cases,
                summary.cases_with_warnings,
                summary.average_confidence
            );
        }

        if let Some(web_path) = &input.web_json {
            let program_info: Option<serde_json::Value> = input
                .program_info
                .as_deref()
                .map(|path| {
                    let content = std::fs::read_to_string(path)?;
                    anyhow::Ok(serde_json::from_str(&content)?)
                })
                .transpose()?;

            export_to_json(
                &cases,
                web_path,
                input.resident_id.as_deref(),
                program_info.as_ref(),
                processor.review_threshold(),
            )?;
        }

        println!("Converted {} case(s) to {}", cases.len(), input.output.display());
        Ok(())
    }
}
