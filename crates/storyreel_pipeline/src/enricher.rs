//! Per-slide enrichment with remote media services.

use crate::ProgressBand;
use derive_getters::Getters;
use std::sync::Arc;
use storyreel_core::Job;
use storyreel_interface::{MediaGenerator, ProgressSink};
use tracing::{info, instrument, warn};

/// Which enrichment pass a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EnrichmentStage {
    /// Widescreen outpainting
    #[display("image expansion")]
    ImageExpansion,
    /// Narration synthesis
    #[display("voice synthesis")]
    VoiceSynthesis,
}

/// Outcome of one enrichment pass.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct EnrichmentReport {
    /// Pass described
    stage: EnrichmentStage,
    /// Slides in the job
    total: usize,
    /// Slides that received the enrichment
    enriched: usize,
    /// Indexes of slides that kept their fallback (original image or silence)
    fell_back: Vec<usize>,
    /// Slides with nothing to enrich
    skipped: usize,
}

impl EnrichmentReport {
    fn new(stage: EnrichmentStage, total: usize) -> Self {
        Self {
            stage,
            total,
            enriched: 0,
            fell_back: Vec::new(),
            skipped: 0,
        }
    }
}

/// Adds expanded images and narration to a job's slides.
///
/// Slides are processed one at a time in index order. A failure on one slide is
/// logged and the slide keeps its fallback: the original image, or no narration.
/// After each slide the job's progress moves linearly through the stage band and is
/// published.
pub struct SlideEnricher {
    generator: Arc<dyn MediaGenerator>,
}

impl SlideEnricher {
    /// Enricher calling `generator`.
    pub fn new(generator: Arc<dyn MediaGenerator>) -> Self {
        Self { generator }
    }

    /// Outpaints every slide image in the job's expansion style.
    #[instrument(skip(self, job, sink), fields(job_id = %job.id(), slides = job.slides().len()))]
    pub async fn expand_images(
        &self,
        job: &mut Job,
        band: ProgressBand,
        sink: &dyn ProgressSink,
    ) -> EnrichmentReport {
        let style = *job.config().expansion_style();
        let total = job.slides().len();
        let mut report = EnrichmentReport::new(EnrichmentStage::ImageExpansion, total);

        for position in 0..total {
            let image = job.slides()[position].image_url().clone();
            match self.generator.expand_image(&image, style).await {
                Ok(url) => {
                    job.slides_mut()[position].set_expanded_image(url);
                    report.enriched += 1;
                }
                Err(e) => {
                    warn!(slide = position, image = %image, error = %e, "Image expansion failed, keeping original image");
                    report.fell_back.push(position);
                }
            }
            step(job, band, position, total, "Expanded image", sink).await;
        }

        info!(enriched = report.enriched, fell_back = report.fell_back.len(), "Image expansion finished");
        report
    }

    /// Synthesizes narration for every slide with voice text.
    #[instrument(skip(self, job, sink), fields(job_id = %job.id(), slides = job.slides().len()))]
    pub async fn synthesize_voices(
        &self,
        job: &mut Job,
        band: ProgressBand,
        sink: &dyn ProgressSink,
    ) -> EnrichmentReport {
        let voice = *job.config().voice_type();
        let speed = *job.config().voice_speed();
        let total = job.slides().len();
        let mut report = EnrichmentReport::new(EnrichmentStage::VoiceSynthesis, total);

        for position in 0..total {
            if job.slides()[position].has_narration() {
                let text = job.slides()[position].voice_text().clone();
                match self.generator.synthesize_voice(&text, voice, speed).await {
                    Ok(synthesized) => {
                        job.slides_mut()[position].set_voice(synthesized);
                        report.enriched += 1;
                    }
                    Err(e) => {
                        warn!(slide = position, error = %e, "Voice synthesis failed, slide stays silent");
                        report.fell_back.push(position);
                    }
                }
            } else {
                report.skipped += 1;
            }
            step(job, band, position, total, "Generated voice", sink).await;
        }

        info!(
            enriched = report.enriched,
            fell_back = report.fell_back.len(),
            skipped = report.skipped,
            "Voice synthesis finished"
        );
        report
    }
}

async fn step(
    job: &mut Job,
    band: ProgressBand,
    position: usize,
    total: usize,
    label: &str,
    sink: &dyn ProgressSink,
) {
    let fraction = (position + 1) as f64 / total as f64;
    if job.record_progress(band.at(fraction), format!("{label} {}/{total}", position + 1)) {
        sink.publish(*job.id(), job.snapshot()).await;
    }
}
