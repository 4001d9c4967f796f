//! Release accumulation: runs the producers of each notice and folds their
//! fragments into releases.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use roxmltree::Document;
use ted_ocds_release::{create_ocds_schema, Fragment, MergeEngine, Release};

use crate::classify::NoticeClassifier;
use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::ordering::NoticeOrderer;
use crate::producer::{create_default_registry, FragmentProducer, ProducerContext, ProducerRegistry};
use crate::staging::NoticeStager;
use crate::types::{AccumulationMode, ConversionReport, NoticeFile, NoticeOutcome, NoticeType};

/// Turns ordered notices into releases.
///
/// Each notice's fragments are merged into a fresh release in producer
/// registration order. In [`AccumulationMode::PerProcedure`] the notice
/// release is then folded into the release of its procedure.
pub struct ReleaseAccumulator {
    registry: ProducerRegistry,
    engine: MergeEngine,
    config: ConverterConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl ReleaseAccumulator {
    #[must_use]
    pub fn new(registry: ProducerRegistry, engine: MergeEngine, config: ConverterConfig) -> Self {
        Self {
            registry,
            engine,
            config,
            cancel: None,
        }
    }

    /// Accumulator with the default producers and the OCDS schema.
    #[must_use]
    pub fn with_defaults(config: ConverterConfig) -> Self {
        Self::new(
            create_default_registry(),
            MergeEngine::new(create_ocds_schema()),
            config,
        )
    }

    /// Stop before the next notice once `flag` is set.
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ProducerRegistry {
        &self.registry
    }

    /// Convert one notice file into its own release.
    ///
    /// Returns the release and the number of fragments applied.
    ///
    /// # Errors
    /// - `Io` / `XmlParse` if the file cannot be read or parsed
    /// - `Producer` if a producer cannot interpret its business term
    /// - `Merge` if a fragment violates the release's identity rules
    pub fn convert_notice(&self, file: &NoticeFile) -> Result<(Release, usize)> {
        let xml = fs::read_to_string(&file.path)?;
        self.convert_xml(&xml, file.notice_type, &file.file_name())
    }

    /// Convert notice XML of a known type into its own release.
    ///
    /// # Errors
    /// See [`convert_notice`](Self::convert_notice).
    pub fn convert_xml(
        &self,
        xml: &str,
        notice_type: NoticeType,
        file_name: &str,
    ) -> Result<(Release, usize)> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if !notice_type.is_known() {
            return Err(NoticeClassifier::unrecognized(file_name, root));
        }

        let context = ProducerContext::new(notice_type, file_name, &self.config.ocid_prefix);
        let producers = self.registry.producers_for(notice_type);

        let run = |producer: &&dyn FragmentProducer| -> Result<Option<Fragment>> {
            producer.produce(root, &mut context.fork())
        };
        let produced: Vec<Result<Option<Fragment>>> = if self.config.parallel_producers {
            producers.par_iter().map(run).collect()
        } else {
            producers.iter().map(run).collect()
        };

        let mut release = Release::new();
        let mut applied = 0;
        for (producer, fragment) in producers.iter().zip(produced) {
            let fragment = fragment.inspect_err(|e| {
                tracing::debug!(file = %file_name, producer = producer.name(), error = %e, "Producer failed");
            })?;
            let Some(fragment) = fragment.filter(|f| !f.is_empty()) else {
                continue;
            };
            self.engine.apply(&mut release, fragment)?;
            applied += 1;
        }

        tracing::debug!(file = %file_name, notice_type = %notice_type, fragments = applied, "Converted notice");
        Ok((release, applied))
    }

    /// Convert ordered notices.
    ///
    /// A failed notice is recorded in the report and does not stop the
    /// run. Unknown notices are skipped.
    #[must_use]
    pub fn run(&self, files: &[NoticeFile]) -> ConversionReport {
        let mut report = ConversionReport::default();
        let mut procedures = ProcedureReleases::default();

        for file in files {
            if self.is_cancelled() {
                tracing::warn!(remaining = files.len() - report.outcomes.len(), "Conversion cancelled");
                report.cancelled = true;
                break;
            }

            let file_name = file.file_name();
            if !file.notice_type.is_known() {
                tracing::warn!(file = %file_name, "Skipping unclassified notice");
                continue;
            }

            let converted = self.convert_notice(file).and_then(|(release, fragments)| {
                if self.config.mode == AccumulationMode::PerProcedure {
                    let key = release.ocid().map_or_else(|| file_name.clone(), str::to_string);
                    procedures.fold(&self.engine, key, release.clone())?;
                }
                Ok((release, fragments))
            });

            let outcome = match converted {
                Ok((release, fragments)) => NoticeOutcome {
                    file_name,
                    notice_type: file.notice_type,
                    fragments,
                    result: Ok(release),
                },
                Err(e) => {
                    tracing::warn!(file = %file_name, error = %e, "Notice failed to convert");
                    NoticeOutcome {
                        file_name,
                        notice_type: file.notice_type,
                        fragments: 0,
                        result: Err(e.to_string()),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        report.releases = match self.config.mode {
            AccumulationMode::PerNotice => report
                .outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().ok().cloned())
                .collect(),
            AccumulationMode::PerProcedure => procedures.into_releases(),
        };
        report
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Releases keyed by procedure, in first-seen order.
#[derive(Default)]
struct ProcedureReleases {
    keys: Vec<String>,
    releases: Vec<Release>,
}

impl ProcedureReleases {
    /// Fold a notice release into its procedure's release.
    ///
    /// The procedure release is left untouched when the merge fails.
    fn fold(&mut self, engine: &MergeEngine, key: String, release: Release) -> Result<()> {
        match self.keys.iter().position(|k| *k == key) {
            Some(index) => engine.apply(&mut self.releases[index], release)?,
            None => {
                self.keys.push(key);
                self.releases.push(release);
            }
        }
        Ok(())
    }

    fn into_releases(self) -> Vec<Release> {
        self.releases
    }
}

/// Stage, classify, order, and convert the notices at `input`.
///
/// # Errors
/// Returns `Input` if `input` is not a notice file or a directory holding
/// notices, or `Io` if staging fails. Failures of individual notices are
/// reported in the returned [`ConversionReport`].
pub fn convert_input(input: &Path, config: ConverterConfig) -> Result<ConversionReport> {
    let mut stager = NoticeStager::new()?;
    let staged = stager.stage(input)?;

    let ordered = NoticeOrderer::default().classify_and_order(&staged);
    if ordered.is_empty() {
        return Err(ConverterError::input(input, "no recognizable notices"));
    }

    Ok(ReleaseAccumulator::with_defaults(config).run(&ordered))
}
