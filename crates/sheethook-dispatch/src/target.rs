use crate::error::RegistrationError;
use crate::host::NamedRanges;

/// The range a trigger watches and the sheet it is limited to.
/// `sheet: None` matches edits on any sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTarget {
    pub range: String,
    pub sheet: Option<String>,
}

impl TriggerTarget {
    /// Watch `range` on every sheet
    pub fn range(range: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            sheet: None,
        }
    }

    pub fn on_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Resolve a named range into a target.
    ///
    /// An existing name wins. Otherwise `fallback` is used to create the name
    /// and the region the host reports is watched from then on.
    pub fn named(
        names: &mut dyn NamedRanges,
        name: &str,
        fallback: Option<TriggerTarget>,
    ) -> Result<Self, RegistrationError> {
        if let Some(region) = names.resolve_named_range(name) {
            tracing::debug!(
                "Using existing named range: {} ({} in sheet {})",
                name,
                region.range,
                region.sheet
            );
            return Ok(Self::range(region.range).on_sheet(region.sheet));
        }

        let fallback = fallback.ok_or_else(|| RegistrationError::UnknownNamedRange(name.to_string()))?;
        let region = names
            .define_named_range(name, fallback.sheet.as_deref(), &fallback.range)
            .map_err(|source| {
                tracing::error!(
                    "Unable to create named range {} over {}: {}",
                    name,
                    fallback.range,
                    source
                );
                RegistrationError::CreateNamedRange {
                    name: name.to_string(),
                    source,
                }
            })?;

        tracing::debug!(
            "Created new named range: {} ({} in sheet {})",
            name,
            region.range,
            region.sheet
        );
        Ok(Self::range(region.range).on_sheet(region.sheet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::host::NamedRegion;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Names {
        regions: HashMap<String, NamedRegion>,
        locked: bool,
    }

    impl NamedRanges for Names {
        fn resolve_named_range(&self, name: &str) -> Option<NamedRegion> {
            self.regions.get(name).cloned()
        }

        fn define_named_range(
            &mut self,
            name: &str,
            sheet: Option<&str>,
            range: &str,
        ) -> Result<NamedRegion, StoreError> {
            if self.locked {
                return Err(StoreError::NamedRange("read-only".into()));
            }
            let region = NamedRegion {
                sheet: sheet.unwrap_or("Active").to_string(),
                range: range.to_string(),
            };
            self.regions.insert(name.to_string(), region.clone());
            Ok(region)
        }
    }

    #[test]
    fn test_existing_name_wins() {
        let mut names = Names::default();
        names.regions.insert(
            "Action".into(),
            NamedRegion {
                sheet: "Offers".into(),
                range: "F2:F".into(),
            },
        );

        let target =
            TriggerTarget::named(&mut names, "Action", Some(TriggerTarget::range("A1"))).unwrap();
        assert_eq!(target, TriggerTarget::range("F2:F").on_sheet("Offers"));
    }

    #[test]
    fn test_missing_name_is_created_from_fallback() {
        let mut names = Names::default();

        let target =
            TriggerTarget::named(&mut names, "Done", Some(TriggerTarget::range("B2:B"))).unwrap();
        assert_eq!(target, TriggerTarget::range("B2:B").on_sheet("Active"));
        assert!(names.resolve_named_range("Done").is_some());
    }

    #[test]
    fn test_missing_name_without_fallback() {
        let mut names = Names::default();
        let err = TriggerTarget::named(&mut names, "Nope", None).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownNamedRange(name) if name == "Nope"));
    }

    #[test]
    fn test_create_failure_is_reported() {
        let mut names = Names {
            locked: true,
            ..Names::default()
        };
        let err = TriggerTarget::named(&mut names, "Done", Some(TriggerTarget::range("B2")))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::CreateNamedRange { .. }));
    }
}
