// Best-effort site platform detection from page HTML

/// Platform name and the markup fragments that give it away.
pub const PLATFORM_SIGNATURES: &[(&str, &[&str])] = &[
    ("WordPress", &["wp-content/", "wp-includes/", "name=\"generator\" content=\"wordpress"]),
    ("Shopify", &["cdn.shopify.com", "shopify.theme", "myshopify.com"]),
    ("Wix", &["static.wixstatic.com", "wix.com website builder", "_wixcssimports"]),
    ("Squarespace", &["static1.squarespace.com", "squarespace-cdn.com", "<!-- this is squarespace"]),
    ("Webflow", &["data-wf-site", "webflow.js", "assets.website-files.com"]),
    ("Drupal", &["drupal.settings", "/sites/default/files/", "data-drupal-"]),
    ("Joomla", &["/media/jui/", "content=\"joomla!", "/components/com_"]),
    ("Magento", &["mage/cookies", "/static/frontend/", "x-magento-init"]),
    ("BigCommerce", &["cdn11.bigcommerce.com", "bigcommerce.com/s-"]),
    ("HubSpot", &["js.hs-scripts.com", "hs-sites.com", "hubspot"]),
    ("Ghost", &["content=\"ghost ", "ghost-portal", "/ghost/api/"]),
    ("Next.js", &["__next_data__", "/_next/static/"]),
    ("Gatsby", &["___gatsby", "gatsby-focus-wrapper"]),
    ("Nuxt", &["__nuxt", "/_nuxt/"]),
];

/// First platform whose signature appears in `html`, compared case-insensitively.
pub fn detect_platform(html: &str) -> Option<&'static str> {
    let haystack = html.to_lowercase();
    PLATFORM_SIGNATURES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| haystack.contains(needle)))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_wordpress() {
        let html = r#"<link rel="stylesheet" href="/wp-content/themes/x/style.css">"#;
        assert_eq!(detect_platform(html), Some("WordPress"));
    }

    #[test]
    fn test_detection_ignores_case() {
        let html = r#"<script id="__NEXT_DATA__" type="application/json">{}</script>"#;
        assert_eq!(detect_platform(html), Some("Next.js"));
    }

    #[test]
    fn test_unknown_platform() {
        assert_eq!(detect_platform("<html><body>hand made</body></html>"), None);
    }

    #[test]
    fn test_signatures_are_lowercase() {
        for (name, needles) in PLATFORM_SIGNATURES {
            for needle in *needles {
                assert_eq!(*needle, needle.to_lowercase(), "{} signature must be lowercase", name);
            }
        }
    }
}
