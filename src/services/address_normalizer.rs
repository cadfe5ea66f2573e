/// Appends a default locality to addresses that do not name one.
///
/// The locality is taken from a reference address (the chosen institute's own
/// address): its last comma-separated segment, or the whole string when it
/// has no comma.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressNormalizer {
    locality: Option<String>,
}

impl AddressNormalizer {
    pub fn from_reference(reference: &str) -> Self {
        let locality = reference.rsplit(',').next().unwrap_or("").trim();

        // An empty or numeric locality would itself look "missing" on the next
        // pass, so it is never injected.
        let locality = if locality.is_empty() || is_all_digits(locality) {
            tracing::warn!(
                reference = %reference,
                "Reference address has no usable locality, addresses left unchanged"
            );
            None
        } else {
            Some(locality.to_string())
        };

        AddressNormalizer { locality }
    }

    pub fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }

    /// Normalize one address. Blank input is returned as is.
    pub fn normalize(&self, address: &str) -> String {
        let Some(locality) = self.locality.as_deref() else {
            return address.to_string();
        };
        if address.trim().is_empty() || !lacks_locality(address) {
            return address.to_string();
        }
        format!("{}, {}", address, locality)
    }

    /// Normalize a column of cells, passing missing cells through.
    pub fn normalize_all(&self, addresses: &[Option<String>]) -> Vec<Option<String>> {
        addresses
            .iter()
            .map(|a| a.as_deref().map(|a| self.normalize(a)))
            .collect()
    }
}

/// Whether the address already ends in a locality segment.
pub fn has_locality(address: &str) -> bool {
    !address.trim().is_empty() && !lacks_locality(address)
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// No comma at all, or a trailing segment that is blank or just a number.
fn lacks_locality(address: &str) -> bool {
    match address.rsplit_once(',') {
        None => true,
        Some((_, last)) => {
            let last = last.trim();
            last.is_empty() || is_all_digits(last)
        }
    }
}
