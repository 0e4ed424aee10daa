//! Per-track record mapping

use std::fmt;

use tracing::{trace, warn};

use crate::domain::coercion;
use crate::domain::errors::CoercionError;
use crate::domain::fields::{DecodedFields, TrackRecord};
use crate::domain::model::StreamKind;
use crate::ports::FieldSource;
use crate::streams::AssembleOptions;

/// A field that could not be decoded and fell back to its zero value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiagnostic {
    pub kind: StreamKind,
    pub track: usize,
    pub field: &'static str,
    pub raw: String,
    pub error: CoercionError,
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} track {} field {:?}: {}",
            self.kind, self.track, self.field, self.error
        )
    }
}

/// Builds typed track records from a field source using the records' field tables
pub struct TrackMapper<'a> {
    source: &'a dyn FieldSource,
    options: AssembleOptions,
    diagnostics: Vec<FieldDiagnostic>,
}

impl<'a> TrackMapper<'a> {
    /// Create a new mapper over an opened source
    pub fn new(source: &'a dyn FieldSource, options: AssembleOptions) -> Self {
        Self {
            source,
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Decode every declared field of track `index` into a `T`.
    ///
    /// Fields are decoded in table order. A field with a correction rule asks
    /// the rule first; the raw value is only read and decoded when the rule
    /// does not apply.
    pub fn map_track<T: TrackRecord>(&mut self, index: usize) -> T {
        let mut decoded = DecodedFields::default();

        for spec in T::fields() {
            let corrected = spec.correction.and_then(|rule| rule.apply(&decoded));

            let value = match corrected {
                Some(value) => {
                    trace!("{} track {}: {} set by {:?}", T::KIND, index, spec.name, spec.correction);
                    value
                }
                None => {
                    let raw = self.source.field_value(T::KIND, index, spec.name);
                    let result = coercion::decode(spec.decode, &raw);
                    if let Some(error) = result.error {
                        self.report(FieldDiagnostic {
                            kind: T::KIND,
                            track: index,
                            field: spec.name,
                            raw,
                            error,
                        });
                    }
                    result.value
                }
            };

            let value = if self.options.with_extra {
                value.with_extra(self.source.field_extra(T::KIND, index, spec.name))
            } else {
                value
            };

            decoded.insert(spec.name, value);
        }

        T::from_decoded(&mut decoded)
    }

    /// Finish mapping and hand over the collected diagnostics
    pub fn into_diagnostics(self) -> Vec<FieldDiagnostic> {
        self.diagnostics
    }

    fn report(&mut self, diagnostic: FieldDiagnostic) {
        warn!("Converting {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::probe_memory::MemorySource;
    use crate::domain::model::{Extra, VideoTrack};

    fn video_source(fields: &[(&str, &str)]) -> MemorySource {
        MemorySource::new().with_track(StreamKind::Video, fields)
    }

    #[test]
    fn test_prores_4444_ignores_raw_bit_depth() {
        for raw in ["", "8", "gibberish"] {
            let source = video_source(&[
                ("Format", "ProRes"),
                ("Format_Profile", "4444"),
                ("BitDepth", raw),
            ]);
            let mut mapper = TrackMapper::new(&source, AssembleOptions::default());
            let video: VideoTrack = mapper.map_track(0);

            assert_eq!(video.bit_depth.val, 12);
            assert!(mapper.into_diagnostics().is_empty());
        }
    }

    #[test]
    fn test_prores_422_hq_is_10_bit() {
        let source = video_source(&[
            ("Format", "ProRes"),
            ("Format_Profile", "422 HQ"),
            ("BitDepth", "8"),
        ]);
        let mut mapper = TrackMapper::new(&source, AssembleOptions::default());
        let video: VideoTrack = mapper.map_track(0);
        assert_eq!(video.bit_depth.val, 10);
    }

    #[test]
    fn test_other_formats_use_reported_bit_depth() {
        let source = video_source(&[("Format", "AVC"), ("Format_Profile", "High"), ("BitDepth", "8")]);
        let mut mapper = TrackMapper::new(&source, AssembleOptions::default());
        let video: VideoTrack = mapper.map_track(0);
        assert_eq!(video.bit_depth.val, 8);

        let source = video_source(&[("Format", "ProRes"), ("Format_Profile", "422"), ("BitDepth", "")]);
        let mut mapper = TrackMapper::new(&source, AssembleOptions::default());
        let video: VideoTrack = mapper.map_track(0);
        assert_eq!(video.bit_depth.val, 0);
    }

    #[test]
    fn test_bad_field_is_reported_and_others_survive() {
        let source = video_source(&[("Width", "1920"), ("Height", "tall"), ("Format", "AVC")]);
        let mut mapper = TrackMapper::new(&source, AssembleOptions::default());
        let video: VideoTrack = mapper.map_track(0);

        assert_eq!(video.width.val, 1920);
        assert_eq!(video.height.val, 0);
        assert_eq!(video.format.val, "AVC");

        let diagnostics = mapper.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "Height");
        assert_eq!(diagnostics[0].raw, "tall");
        assert_eq!(diagnostics[0].kind, StreamKind::Video);
        assert!(matches!(diagnostics[0].error, CoercionError::InvalidInt(_)));
    }

    #[test]
    fn test_extra_attached_only_when_requested() {
        let extra = Extra {
            measure: " pixels".to_string(),
            name_text: "Width".to_string(),
            info: String::new(),
        };
        let source = video_source(&[("Width", "1280")]).with_extra(StreamKind::Video, 0, "Width", extra.clone());

        let mut mapper = TrackMapper::new(&source, AssembleOptions::default());
        let plain: VideoTrack = mapper.map_track(0);
        assert!(plain.width.extra.is_empty());

        let mut mapper = TrackMapper::new(&source, AssembleOptions { with_extra: true });
        let enriched: VideoTrack = mapper.map_track(0);
        assert_eq!(enriched.width.val, 1280);
        assert_eq!(enriched.width.extra, extra);
    }
}
