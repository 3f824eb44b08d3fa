//! Core application

use std::path::Path;

use anyhow::Result;
use futures::future::join_all;
use serde_json::json;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::data::metadata::init_metadata_service;
use crate::domain::filters::{
    BooleanOperator, Column, FilterContext, FilterError, FilterExpression, Filtering,
};
use crate::utils::file::read_json;

pub struct CoreApp {
    pub config: AppConfig,
    pub context: FilterContext,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;
        match command {
            Commands::Inspect {
                columns,
                expression,
                records,
            } => {
                let app = Self::init(config, records.as_deref())?;
                app.inspect(&columns, &expression).await
            }
            Commands::Normalize {
                columns,
                expression,
                or,
            } => {
                let app = Self::init(config, None)?;
                let boolean_operator = if or {
                    BooleanOperator::Or
                } else {
                    BooleanOperator::And
                };
                app.normalize(&columns, &expression, boolean_operator)
            }
        }
    }

    fn init(config: AppConfig, records: Option<&Path>) -> Result<Self> {
        let mut context = FilterContext::new(config.filter.clone());
        if let Some(metadata) = init_metadata_service(&config, records)? {
            context = context.with_metadata(metadata);
        }
        Ok(Self { config, context })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn inspect(&self, columns_path: &Path, expression_path: &Path) -> Result<()> {
        let columns: Vec<Column> = read_json(columns_path)?;
        let expression: FilterExpression = read_json(expression_path)?;
        let report = self.inspect_report(&columns, expression).await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    fn normalize(
        &self,
        columns_path: &Path,
        expression_path: &Path,
        boolean_operator: BooleanOperator,
    ) -> Result<()> {
        let columns: Vec<Column> = read_json(columns_path)?;
        let expression: FilterExpression = read_json(expression_path)?;
        let filtering = self.hydrate(&columns, expression);

        match filtering.filter_expression(boolean_operator) {
            Ok(normalized) => {
                println!("{}", serde_json::to_string_pretty(&normalized)?);
                Ok(())
            }
            Err(FilterError::InvalidConditions { condition_ids }) => {
                for filter in filtering.column_filters() {
                    for id in &condition_ids {
                        let Some(condition) = filter.condition(id) else {
                            continue;
                        };
                        let messages: Vec<String> = condition
                            .validation_result()
                            .into_iter()
                            .filter(|r| r.error)
                            .map(|r| r.error_message)
                            .collect();
                        eprintln!(
                            "{} [{}] {}: {}",
                            filter.column().name,
                            id,
                            condition.operator(false),
                            messages.join("; ")
                        );
                    }
                }
                Err(FilterError::InvalidConditions { condition_ids }.into())
            }
        }
    }

    /// Filtering hydrated for `columns` from `expression`
    fn hydrate(&self, columns: &[Column], expression: FilterExpression) -> Filtering {
        let scanned = expression.conditions.len();
        let mut filtering = Filtering::new(self.context.clone());
        filtering.on_filter_expression_changed(expression);

        let hydrated: usize = columns
            .iter()
            .map(|column| filtering.column_filter(column).conditions().len())
            .sum();
        if hydrated < scanned {
            tracing::debug!(
                skipped = scanned - hydrated,
                "Conditions not editable in any column"
            );
        }
        filtering
    }

    /// Per-column editable conditions, with lookup references resolved
    async fn inspect_report(
        &self,
        columns: &[Column],
        expression: FilterExpression,
    ) -> serde_json::Value {
        let filtering = self.hydrate(columns, expression);

        let mut report = Vec::with_capacity(columns.len());
        for filter in filtering.column_filters() {
            join_all(filter.conditions().iter().map(|c| c.load_control_value())).await;
            let snapshots: Vec<_> = filter.conditions().iter().map(|c| c.snapshot()).collect();
            report.push(json!({
                "column": filter.column().name,
                "dataType": filter.column().data_type,
                "applied": filter.is_applied_to_dataset(),
                "supportedOperators": filter.conditions().first().map(|c| {
                    c.supported_operators()
                        .iter()
                        .map(|op| op.as_str())
                        .collect::<Vec<_>>()
                }),
                "conditions": snapshots,
            }));
        }
        serde_json::Value::Array(report)
    }
}
