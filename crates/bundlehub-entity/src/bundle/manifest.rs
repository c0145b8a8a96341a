//! iOS over-the-air installation manifest.
//!
//! Installing an `.ipa` through Safari requires an
//! `itms-services://?action=download-manifest&url=...` link pointing at a
//! property-list manifest describing the package. This module renders that
//! manifest from the owning app's title, the bundle version, and the
//! absolute package URL.

use std::io::{Cursor, Read};

use serde::{Deserialize, Serialize};

/// An installable-manifest document for one iOS bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Title shown in the installation prompt.
    pub title: String,
    /// Bundle version shown in the installation prompt.
    pub version: String,
    /// Absolute URL of the `.ipa` package.
    pub url: String,
}

impl InstallManifest {
    /// Create a manifest for the given app title, bundle version, and
    /// package URL.
    pub fn new(
        title: impl Into<String>,
        version: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            url: url.into(),
        }
    }

    /// Render the manifest as property-list XML.
    pub fn to_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>items</key>
    <array>
        <dict>
            <key>assets</key>
            <array>
                <dict>
                    <key>kind</key>
                    <string>software-package</string>
                    <key>url</key>
                    <string>{url}</string>
                </dict>
            </array>
            <key>metadata</key>
            <dict>
                <key>bundle-version</key>
                <string>{version}</string>
                <key>kind</key>
                <string>software</string>
                <key>title</key>
                <string>{title}</string>
            </dict>
        </dict>
    </array>
</dict>
</plist>
"#,
            url = xml_escape(&self.url),
            version = xml_escape(&self.version),
            title = xml_escape(&self.title),
        )
    }

    /// A readable stream over the serialized manifest.
    pub fn into_reader(self) -> impl Read {
        Cursor::new(self.to_xml().into_bytes())
    }
}

/// Escape the five XML-reserved characters.
fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_contains_fields() {
        let manifest = InstallManifest::new(
            "My App",
            "1.4.0",
            "https://dist.example.com/bundle/9/file.ipa",
        );
        let xml = manifest.to_xml();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<string>software-package</string>"));
        assert!(xml.contains("<string>https://dist.example.com/bundle/9/file.ipa</string>"));
        assert!(xml.contains("<string>1.4.0</string>"));
        assert!(xml.contains("<string>My App</string>"));
    }

    #[test]
    fn test_manifest_escapes_reserved_characters() {
        let manifest = InstallManifest::new(
            "Dungeons & Dragons <beta>",
            "1.0",
            "https://dist.example.com/file?id=1&kind=ipa",
        );
        let xml = manifest.to_xml();

        assert!(xml.contains("Dungeons &amp; Dragons &lt;beta&gt;"));
        assert!(xml.contains("id=1&amp;kind=ipa"));
        assert!(!xml.contains("Dragons <beta>"));
    }

    #[test]
    fn test_reader_yields_serialized_bytes() {
        let manifest = InstallManifest::new("App", "2.0", "https://x/file.ipa");
        let expected = manifest.to_xml();

        let mut buffer = String::new();
        manifest.into_reader().read_to_string(&mut buffer).unwrap();
        assert_eq!(buffer, expected);
    }
}
