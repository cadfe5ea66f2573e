use crate::config::ColumnKeywords;
use crate::error::{AppError, ColumnKind, Result};
use crate::models::Dataset;

/// Resolved positions of the two columns a route build needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetColumns {
    pub address: usize,
    pub institute: usize,
}

/// Finds the address and institute columns by header keywords.
#[derive(Debug, Clone)]
pub struct ColumnDetector {
    keywords: ColumnKeywords,
}

impl ColumnDetector {
    pub fn new(keywords: ColumnKeywords) -> Self {
        let lowercase = |list: Vec<String>| -> Vec<String> {
            list.into_iter().map(|k| k.to_lowercase()).collect()
        };
        ColumnDetector {
            keywords: ColumnKeywords {
                address: lowercase(keywords.address),
                institute: lowercase(keywords.institute),
            },
        }
    }

    /// First header containing any keyword of `kind`.
    pub fn find(&self, dataset: &Dataset, kind: ColumnKind) -> Result<usize> {
        let keywords = match kind {
            ColumnKind::Address => &self.keywords.address,
            ColumnKind::Institute => &self.keywords.institute,
        };

        dataset
            .columns
            .iter()
            .position(|header| {
                let header = header.trim().to_lowercase();
                keywords.iter().any(|k| header.contains(k.as_str()))
            })
            .ok_or(AppError::MissingColumn { kind })
    }

    pub fn detect(&self, dataset: &Dataset) -> Result<SheetColumns> {
        let columns = SheetColumns {
            address: self.find(dataset, ColumnKind::Address)?,
            institute: self.find(dataset, ColumnKind::Institute)?,
        };
        tracing::debug!(
            address = %dataset.columns[columns.address],
            institute = %dataset.columns[columns.institute],
            "Detected sheet columns"
        );
        Ok(columns)
    }

    /// Use explicitly named columns where given, detection otherwise.
    pub fn resolve(
        &self,
        dataset: &Dataset,
        address_column: Option<&str>,
        institute_column: Option<&str>,
    ) -> Result<SheetColumns> {
        let address = match address_column {
            Some(name) => dataset.column_index(name).ok_or(AppError::MissingColumn {
                kind: ColumnKind::Address,
            })?,
            None => self.find(dataset, ColumnKind::Address)?,
        };
        let institute = match institute_column {
            Some(name) => dataset.column_index(name).ok_or(AppError::MissingColumn {
                kind: ColumnKind::Institute,
            })?,
            None => self.find(dataset, ColumnKind::Institute)?,
        };
        Ok(SheetColumns { address, institute })
    }
}

impl Default for ColumnDetector {
    fn default() -> Self {
        Self::new(ColumnKeywords::default())
    }
}
