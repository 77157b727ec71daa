//! Email document rendering
//!
//! Pure string-out rendering: all asset paths handed in are already
//! workspace-relative, so the produced document is self-contained once it
//! sits next to its `images/` directory.

use brandmail_core::{AppError, BrandColors, Link};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::workspace::ResolvedCoupon;

/// Reserved bracketed token replaced with the brand display name in
/// free-text copy. Matches `[brand]`, `[ Brand ]`, `[BRAND]`, etc.
fn brand_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\[\s*brand\s*\]").expect("brand token regex"))
}

/// Replace every bracketed brand token in `text` with `brand_name`,
/// leaving the rest of the text unchanged.
pub fn substitute_brand(text: &str, brand_name: &str) -> String {
    brand_token().replace_all(text, brand_name).into_owned()
}

/// Everything one brand's template needs. Paths are workspace-relative.
#[derive(Debug, Clone, Serialize)]
pub struct EmailData {
    pub title: String,
    pub body_copy: String,
    pub brand_name: String,
    pub colors: BrandColors,
    pub phone: Option<String>,
    pub header_links: Vec<Link>,
    pub footer_links: Vec<Link>,
    pub logo_path: String,
    pub header_path: String,
    pub footer_graphic_path: Option<String>,
    pub coupons: Vec<ResolvedCoupon>,
    pub notification: Option<String>,
    pub disclaimer: Option<String>,
}

const EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{{title}}</title>
</head>
<body style="margin:0;padding:0;background-color:#f4f4f4;font-family:Arial,Helvetica,sans-serif;">
<table role="presentation" width="600" align="center" cellpadding="0" cellspacing="0" style="background-color:#ffffff;">
<tr>
<td style="padding:16px;text-align:center;background-color:{{colors.primary}};">
<img src="{{logo_path}}" alt="{{brand_name}}" style="max-height:60px;">
{{#if header_links}}
<p style="margin:8px 0 0 0;">
{{#each header_links}}
<a href="{{url}}" style="color:{{../colors.secondary}};margin:0 8px;text-decoration:none;">{{label}}</a>
{{/each}}
</p>
{{/if}}
</td>
</tr>
<tr>
<td><img src="{{header_path}}" alt="" width="600" style="display:block;width:100%;"></td>
</tr>
<tr>
<td style="padding:24px;">
<h1 style="color:{{colors.primary}};margin-top:0;">{{title}}</h1>
<p>{{body_copy}}</p>
{{#if notification}}
<p style="color:{{colors.primary}};font-weight:bold;">{{notification}}</p>
{{/if}}
</td>
</tr>
{{#each coupons}}
<tr>
<td style="padding:0 24px 16px 24px;text-align:center;">
<img src="{{rel_path}}" alt="Coupon {{id}}" width="{{width}}" height="{{height}}" style="display:inline-block;max-width:100%;">
</td>
</tr>
{{/each}}
{{#if footer_graphic_path}}
<tr>
<td><img src="{{footer_graphic_path}}" alt="" width="600" style="display:block;width:100%;"></td>
</tr>
{{/if}}
<tr>
<td style="padding:16px;text-align:center;background-color:{{colors.primary}};color:{{colors.secondary}};">
{{#if phone}}
<p style="margin:0 0 8px 0;">Call us: {{phone}}</p>
{{/if}}
{{#if footer_links}}
<p style="margin:0;">
{{#each footer_links}}
<a href="{{url}}" style="color:{{../colors.secondary}};margin:0 8px;text-decoration:none;">{{label}}</a>
{{/each}}
</p>
{{/if}}
{{#if disclaimer}}
<p style="margin:8px 0 0 0;font-size:10px;">{{disclaimer}}</p>
{{/if}}
</td>
</tr>
</table>
</body>
</html>
"#;

/// Render one brand's email document body.
pub fn render_email(data: &EmailData) -> Result<String, AppError> {
    let mut handlebars = handlebars::Handlebars::new();
    handlebars
        .register_template_string("email", EMAIL_TEMPLATE)
        .map_err(|e| AppError::Render(format!("Failed to register email template: {}", e)))?;

    handlebars
        .render("email", data)
        .map_err(|e| AppError::Render(format!("Failed to render email template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_data() -> EmailData {
        EmailData {
            title: "Save at Acme Tire!".to_string(),
            body_copy: "Big savings this month.".to_string(),
            brand_name: "Acme Tire".to_string(),
            colors: BrandColors {
                primary: "#003366".to_string(),
                secondary: "#ffffff".to_string(),
                accent: None,
            },
            phone: Some("555-0100".to_string()),
            header_links: vec![Link {
                label: "Shop".to_string(),
                url: "https://example.com/shop".to_string(),
            }],
            footer_links: vec![],
            logo_path: "images/logo.jpg".to_string(),
            header_path: "images/header.jpg".to_string(),
            footer_graphic_path: None,
            coupons: vec![ResolvedCoupon {
                id: "1".to_string(),
                rel_path: "images/1_oil.jpg".to_string(),
                width: 51,
                height: 25,
            }],
            notification: None,
            disclaimer: Some("Participating locations only.".to_string()),
        }
    }

    #[test]
    fn test_substitute_brand_variants() {
        for input in ["[brand]", "[ brand ]", "[Brand]", "[ Brand]", "[BRAND ]"] {
            let text = format!("Save at {}!", input);
            assert_eq!(
                substitute_brand(&text, "Acme Tire"),
                "Save at Acme Tire!",
                "failed for {}",
                input
            );
        }
    }

    #[test]
    fn test_substitute_brand_no_token_unchanged() {
        assert_eq!(substitute_brand("No token here", "Acme"), "No token here");
        assert_eq!(substitute_brand("[brandish]", "Acme"), "[brandish]");
    }

    #[test]
    fn test_substitute_brand_all_occurrences() {
        assert_eq!(
            substitute_brand("[brand] and [ BRAND ]", "Acme"),
            "Acme and Acme"
        );
    }

    #[test]
    fn test_render_embeds_relative_paths_and_dimensions() {
        let html = render_email(&test_data()).unwrap();
        assert!(html.contains(r#"src="images/logo.jpg""#));
        assert!(html.contains(r#"src="images/header.jpg""#));
        assert!(html.contains(r#"src="images/1_oil.jpg""#));
        assert!(html.contains(r#"width="51" height="25""#));
        assert!(html.contains("Save at Acme Tire!"));
        assert!(html.contains("Participating locations only."));
        // No footer graphic configured, so no footer.jpg reference
        assert!(!html.contains("images/footer.jpg"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let data = test_data();
        assert_eq!(render_email(&data).unwrap(), render_email(&data).unwrap());
    }

    #[test]
    fn test_render_with_footer_graphic() {
        let mut data = test_data();
        data.footer_graphic_path = Some("images/footer.jpg".to_string());
        let html = render_email(&data).unwrap();
        assert!(html.contains(r#"src="images/footer.jpg""#));
    }
}
