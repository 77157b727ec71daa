//! Coupon asset matcher
//!
//! Resolves the ordered coupon identifiers submitted for one brand against
//! the uploaded coupon files. A file matches identifier `N` when its
//! original filename begins with `N`, followed by a separator character and
//! at least one further alphanumeric character. The leading-token rule
//! keeps `1` from matching `10_deal.jpg`.

use brandmail_core::UploadedFile;

/// One coupon identifier resolved to an uploaded file.
#[derive(Debug, Clone)]
pub struct MatchedCoupon {
    pub id: String,
    pub file: UploadedFile,
}

/// True when `filename` starts with `id` as a complete leading token.
fn is_leading_token(filename: &str, id: &str) -> bool {
    let Some(rest) = filename.strip_prefix(id) else {
        return false;
    };
    let mut chars = rest.chars();
    match chars.next() {
        // Separator must not extend the identifier token
        Some(sep) if !sep.is_alphanumeric() => chars.any(|c| c.is_alphanumeric()),
        _ => false,
    }
}

/// Match submitted identifiers against the uploaded coupon files.
///
/// Output order follows the submitted identifier order, never upload order.
/// An identifier with no match is dropped with a warning. An identifier
/// with several matches resolves to the first file in upload order; this
/// tie-break is deliberate and deterministic because uploads are kept in
/// the order the multipart boundary received them.
pub fn match_coupons(ids: &[String], uploads: &[UploadedFile]) -> Vec<MatchedCoupon> {
    let mut resolved = Vec::with_capacity(ids.len());

    for id in ids {
        let mut matches = uploads
            .iter()
            .filter(|f| is_leading_token(&f.original_filename, id));

        match matches.next() {
            None => {
                tracing::warn!(coupon_id = %id, "No uploaded file matches coupon identifier, dropping coupon");
            }
            Some(first) => {
                let ambiguous: Vec<&str> = matches
                    .map(|f| f.original_filename.as_str())
                    .collect();
                if !ambiguous.is_empty() {
                    tracing::warn!(
                        coupon_id = %id,
                        chosen = %first.original_filename,
                        also_matched = ?ambiguous,
                        "Ambiguous coupon match, using first file in upload order"
                    );
                }
                resolved.push(MatchedCoupon {
                    id: id.clone(),
                    file: first.clone(),
                });
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile::new(name, format!("/tmp/spool/{}", name), "image/jpeg")
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_leading_token_never_matches_longer_identifier() {
        let uploads = vec![upload("17_foo.jpg"), upload("70_foo.jpg")];
        assert!(match_coupons(&ids(&["7"]), &uploads).is_empty());
        assert!(match_coupons(&ids(&["1"]), &uploads).is_empty());
    }

    #[test]
    fn test_exact_leading_token_matches() {
        let uploads = vec![upload("7_frontend.jpg")];
        let resolved = match_coupons(&ids(&["7"]), &uploads);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "7");
        assert_eq!(resolved[0].file.original_filename, "7_frontend.jpg");
    }

    #[test]
    fn test_separator_alone_is_not_a_match() {
        let uploads = vec![upload("7_")];
        assert!(match_coupons(&ids(&["7"]), &uploads).is_empty());
    }

    #[test]
    fn test_ambiguous_match_takes_first_in_upload_order() {
        let uploads = vec![upload("7_frontend.jpg"), upload("7_rear-deal.jpg")];
        let resolved = match_coupons(&ids(&["7"]), &uploads);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].file.original_filename, "7_frontend.jpg");
    }

    #[test]
    fn test_output_follows_submitted_order() {
        let uploads = vec![upload("1_a.jpg"), upload("2_b.jpg"), upload("3_c.jpg")];
        let resolved = match_coupons(&ids(&["3", "1"]), &uploads);
        let order: Vec<&str> = resolved.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["3", "1"]);
    }

    #[test]
    fn test_unmatched_identifier_is_dropped_and_rest_continue() {
        let uploads = vec![upload("2_b.jpg")];
        let resolved = match_coupons(&ids(&["9", "2"]), &uploads);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "2");
    }

    #[test]
    fn test_dot_counts_as_separator() {
        let uploads = vec![upload("7.jpg")];
        let resolved = match_coupons(&ids(&["7"]), &uploads);
        assert_eq!(resolved.len(), 1);
    }
}
