//! Decoded-size estimates for base64 payloads, used for audit telemetry.

/// Returns the part of a base64 string that follows an optional data-URI
/// prefix such as `data:image/png;base64,`.
pub fn strip_data_uri(value: &str) -> &str {
    match value.split(',').nth(1) {
        Some(payload) => payload,
        None => value,
    }
}

/// Estimates the decoded byte length of a base64 string without decoding it.
///
/// Computed as `len * 3 / 4` minus trailing `=` padding. Inputs whose padding
/// exceeds that estimate (malformed) yield 0.
pub fn estimate_decoded_size(value: &str) -> u64 {
    let payload = strip_data_uri(value);
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count() as u64;
    let estimate = payload.len() as u64 * 3 / 4;
    estimate.saturating_sub(padding)
}

/// Sums [`estimate_decoded_size`] over every generated image.
pub fn total_decoded_size<S: AsRef<str>>(images: Option<&[S]>) -> u64 {
    images
        .map(|images| {
            images
                .iter()
                .map(|image| estimate_decoded_size(image.as_ref()))
                .sum()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn test_matches_real_decoded_length() {
        for len in [0usize, 1, 2, 3, 4, 5, 100, 1024] {
            let encoded = STANDARD.encode(vec![7u8; len]);
            assert_eq!(estimate_decoded_size(&encoded), len as u64, "len {}", len);
        }
    }

    #[test]
    fn test_strips_data_uri_prefix() {
        let encoded = STANDARD.encode(b"hello world");
        let with_prefix = format!("data:image/png;base64,{}", encoded);
        assert_eq!(strip_data_uri(&with_prefix), encoded);
        assert_eq!(estimate_decoded_size(&with_prefix), 11);
    }

    #[test]
    fn test_plain_string_untouched() {
        assert_eq!(strip_data_uri("aGVsbG8="), "aGVsbG8=");
    }

    #[test]
    fn test_malformed_input_is_zero() {
        assert_eq!(estimate_decoded_size(""), 0);
        assert_eq!(estimate_decoded_size("=="), 0);
        assert_eq!(estimate_decoded_size("data:image/png;base64,"), 0);
    }

    #[test]
    fn test_total_over_images() {
        let images = vec![STANDARD.encode([1u8; 30]), STANDARD.encode([2u8; 31])];
        assert_eq!(total_decoded_size(Some(images.as_slice())), 61);
        assert_eq!(total_decoded_size::<String>(None), 0);
    }
}
