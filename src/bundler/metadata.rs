//! Info.plist patching.
//!
//! The document is treated as an open key-value map, never a fixed schema:
//! exactly six keys are owned by the bundler, and every other key rides
//! through the binary round trip untouched. This keeps unknown metadata the
//! template ships (document types, ATS exceptions, and the like) intact.

use super::StagePaths;
use crate::error::{Error, Result};
use crate::settings::Settings;
use plist::Value;
use std::io::Cursor;

/// The six Info.plist keys this bundler owns.
const KEY_IDENTIFIER: &str = "CFBundleIdentifier";
const KEY_SHORT_VERSION: &str = "CFBundleShortVersionString";
const KEY_VERSION: &str = "CFBundleVersion";
const KEY_EXECUTABLE: &str = "CFBundleExecutable";
const KEY_COPYRIGHT: &str = "NSHumanReadableCopyright";
const KEY_NAME: &str = "CFBundleName";

/// Decodes the bundle's binary Info.plist, sets the six significant keys
/// from the settings, and overwrites the same file in binary form.
///
/// Defaults apply here: the bundle identifier falls back to
/// [`Settings::DEFAULT_BUNDLE_ID`] and the version to `"1.0.0"`. The
/// copyright key is written only when a value was supplied. The executable
/// and display names are both set to the product name, matching the renamed
/// bundle executable.
pub async fn patch_info_plist(settings: &Settings, paths: &StagePaths) -> Result<()> {
    let path = &paths.info_plist;
    log::debug!("Patching {}", path.display());

    let bytes = tokio::fs::read(path).await.map_err(|e| Error::PlistParse {
        path: path.clone(),
        error: e.to_string(),
    })?;

    let mut document = Value::from_reader(Cursor::new(bytes)).map_err(|e| Error::PlistParse {
        path: path.clone(),
        error: e.to_string(),
    })?;

    let dict = document
        .as_dictionary_mut()
        .ok_or_else(|| Error::PlistParse {
            path: path.clone(),
            error: "top-level value is not a dictionary".into(),
        })?;

    dict.insert(
        KEY_IDENTIFIER.into(),
        Value::String(settings.bundle_id().into()),
    );
    dict.insert(
        KEY_SHORT_VERSION.into(),
        Value::String(settings.version().into()),
    );
    dict.insert(KEY_VERSION.into(), Value::String(settings.version().into()));
    dict.insert(
        KEY_EXECUTABLE.into(),
        Value::String(settings.product_name().into()),
    );
    dict.insert(KEY_NAME.into(), Value::String(settings.product_name().into()));
    if let Some(copyright) = settings.copyright() {
        dict.insert(KEY_COPYRIGHT.into(), Value::String(copyright.into()));
    }

    let mut encoded = Vec::new();
    document
        .to_writer_binary(&mut encoded)
        .map_err(|e| Error::PlistWrite {
            path: path.clone(),
            error: e.to_string(),
        })?;

    tokio::fs::write(path, encoded)
        .await
        .map_err(|e| Error::PlistWrite {
            path: path.clone(),
            error: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsBuilder;
    use plist::Dictionary;

    fn settings_for(dir: &std::path::Path) -> Settings {
        SettingsBuilder::new()
            .output_directory(dir)
            .template_directory(dir.join("template"))
            .program_directory(dir.join("pkg"))
            .product_name("Foo")
            .executable_name("foo-bin")
            .icon(dir.join("icon.icns"))
            .version("2.1.0")
            .build()
            .unwrap()
    }

    fn write_binary_plist(path: &std::path::Path, dict: Dictionary) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        Value::Dictionary(dict).to_file_binary(path).unwrap();
    }

    #[tokio::test]
    async fn sets_significant_keys_and_preserves_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(dir.path());
        let paths = StagePaths::resolve(&settings);

        let mut dict = Dictionary::new();
        dict.insert("CFBundleIdentifier".into(), Value::String("template.id".into()));
        dict.insert("LSMinimumSystemVersion".into(), Value::String("10.13".into()));
        dict.insert("NSHighResolutionCapable".into(), Value::Boolean(true));
        dict.insert(
            "CFBundleDocumentTypes".into(),
            Value::Array(vec![Value::String("public.data".into())]),
        );
        dict.insert("SigningSeed".into(), Value::Data(vec![0xde, 0xad, 0xbe, 0xef]));
        write_binary_plist(&paths.info_plist, dict);

        patch_info_plist(&settings, &paths).await.unwrap();

        let patched = Value::from_file(&paths.info_plist).unwrap();
        let patched = patched.as_dictionary().unwrap();
        assert_eq!(
            patched.get("CFBundleIdentifier").unwrap().as_string(),
            Some(Settings::DEFAULT_BUNDLE_ID)
        );
        assert_eq!(
            patched.get("CFBundleShortVersionString").unwrap().as_string(),
            Some("2.1.0")
        );
        assert_eq!(patched.get("CFBundleVersion").unwrap().as_string(), Some("2.1.0"));
        assert_eq!(patched.get("CFBundleExecutable").unwrap().as_string(), Some("Foo"));
        assert_eq!(patched.get("CFBundleName").unwrap().as_string(), Some("Foo"));
        // No copyright supplied, key stays absent
        assert!(patched.get("NSHumanReadableCopyright").is_none());
        // Keys the bundler does not own ride through unchanged
        assert_eq!(
            patched.get("LSMinimumSystemVersion").unwrap().as_string(),
            Some("10.13")
        );
        assert_eq!(
            patched.get("NSHighResolutionCapable").unwrap().as_boolean(),
            Some(true)
        );
        assert_eq!(
            patched.get("CFBundleDocumentTypes").unwrap(),
            &Value::Array(vec![Value::String("public.data".into())])
        );
        assert_eq!(
            patched.get("SigningSeed").unwrap(),
            &Value::Data(vec![0xde, 0xad, 0xbe, 0xef])
        );
    }

    #[tokio::test]
    async fn malformed_document_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(dir.path());
        let paths = StagePaths::resolve(&settings);

        std::fs::create_dir_all(paths.info_plist.parent().unwrap()).unwrap();
        std::fs::write(&paths.info_plist, b"not a plist").unwrap();

        let err = patch_info_plist(&settings, &paths).await.unwrap_err();
        assert!(matches!(err, Error::PlistParse { .. }));
    }

    #[tokio::test]
    async fn non_dictionary_document_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(dir.path());
        let paths = StagePaths::resolve(&settings);

        std::fs::create_dir_all(paths.info_plist.parent().unwrap()).unwrap();
        Value::Array(vec![Value::String("lonely".into())])
            .to_file_binary(&paths.info_plist)
            .unwrap();

        let err = patch_info_plist(&settings, &paths).await.unwrap_err();
        assert!(matches!(err, Error::PlistParse { .. }));
    }
}
