//! Configuration file support.
use std::{
    env, fmt,
    fs::{create_dir_all, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use toml_edit::{value, Array, DocumentMut, Item, Value};

use crate::common::*;

/// How long, in characters, a comma-separated HubSpot property list may get
/// before we split it into another request.
pub const DEFAULT_HUBSPOT_PROPERTY_CHUNK_LENGTH: usize = 2000;

/// How many days of analytics we request at once from APIs which limit the
/// size of a date range.
pub const DEFAULT_DATE_WINDOW_DAYS: u32 = 30;

/// Find the path to our configuration directory.
pub(crate) fn config_dir() -> Result<PathBuf> {
    // Use `var_os` instead of `var`, because if it returns a non-Unicode path,
    // we can hand it off directly to `PathBuf`.
    match env::var_os("INGESTR_CONFIG_DIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(dirs::config_dir()
            // AFAIK, this only fails under weird conditions, such as no home
            // directory.
            .ok_or_else(|| format_err!("could not find user config dir"))?
            .join("ingestr")),
    }
}

/// Find the path to our configuration file.
pub(crate) fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("ingestr.toml"))
}

/// A configuration file key.
#[derive(Debug)]
pub struct Key<'a> {
    /// The key in the TOML file.
    key: &'a str,
}

impl Key<'_> {
    /// A key for accessing `masks`.
    pub fn masks() -> Key<'static> {
        Self::global("masks")
    }

    /// A top-level configuration key.
    pub(crate) fn global(key: &str) -> Key<'_> {
        Key { key }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.key.fmt(f)
    }
}

/// Our `ingestr.toml` configuration file.
///
/// ```toml
/// aws_region = "us-east-1"
/// masks = ["email:email", "ssn:ssn"]
/// hubspot_property_chunk_length = 2000
/// date_window_days = 30
/// ```
#[derive(Debug)]
pub struct Configuration {
    /// The path from which we read this file.
    path: PathBuf,
    /// Our raw configuration data.
    doc: DocumentMut,
}

// We use `toml_edit` so that we can rewrite the file without losing any
// comments or formatting the user had in it. The price is that we have to
// pick apart untyped TOML values by hand.
impl Configuration {
    /// Load our default configuration.
    pub fn try_default() -> Result<Self> {
        Self::from_path(&config_file()?)
    }

    /// Load the configuration file at `path`. A missing file is treated as
    /// empty.
    pub fn from_path(path: &Path) -> Result<Self> {
        match File::open(path) {
            Ok(rdr) => Ok(Self::from_reader(path.to_owned(), rdr)
                .with_context(|| format!("could not read file {}", path.display()))?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self {
                path: path.to_owned(),
                doc: DocumentMut::default(),
            }),
            Err(err) => {
                Err(err).context(format!("could not open file {}", path.display()))
            }
        }
    }

    /// Load a configuration file from the specified reader.
    fn from_reader<R>(path: PathBuf, mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = String::new();
        rdr.read_to_string(&mut buf)?;
        let doc = buf.parse::<DocumentMut>()?;
        Ok(Self { path, doc })
    }

    /// Write the configuration file to disk.
    pub fn write(&self) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            format_err!("cannot find parent directory of {}", self.path.display())
        })?;
        create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
        let data = self.doc.to_string();
        let mut f = File::create(&self.path)
            .with_context(|| format!("cannot create {}", self.path.display()))?;
        f.write_all(data.as_bytes())
            .with_context(|| format!("error writing to {}", self.path.display()))?;
        f.flush()
            .with_context(|| format!("error writing to {}", self.path.display()))?;
        Ok(())
    }

    /// The AWS region to use when a connection URI doesn't name one.
    pub fn aws_region(&self) -> Result<Option<String>> {
        self.optional_string(&Key::global("aws_region"))
    }

    /// Set the fallback AWS region.
    pub fn set_aws_region(&mut self, region: &str) {
        self.doc["aws_region"] = value(region);
    }

    /// Column masks to apply to every record, as `column:algorithm[:param]`.
    pub fn masks(&self) -> Result<Vec<String>> {
        self.string_array(&Key::masks())
    }

    /// The longest comma-separated property list we send to HubSpot.
    pub fn hubspot_property_chunk_length(&self) -> Result<usize> {
        let length = self
            .optional_integer(&Key::global("hubspot_property_chunk_length"))?
            .map(|length| {
                usize::try_from(length).map_err(|_| {
                    format_err!(
                        "hubspot_property_chunk_length must be positive in {}",
                        self.path.display(),
                    )
                })
            })
            .transpose()?;
        Ok(length.unwrap_or(DEFAULT_HUBSPOT_PROPERTY_CHUNK_LENGTH))
    }

    /// How many days of data to request at once from date-limited APIs.
    pub fn date_window_days(&self) -> Result<u32> {
        match self.optional_integer(&Key::global("date_window_days"))? {
            None => Ok(DEFAULT_DATE_WINDOW_DAYS),
            Some(days) => match u32::try_from(days) {
                Ok(days) if days > 0 => Ok(days),
                _ => Err(format_err!(
                    "date_window_days must be a positive integer in {}, found {}",
                    self.path.display(),
                    days,
                )),
            },
        }
    }

    /// Get an optional string from our config file.
    fn optional_string(&self, key: &Key<'_>) -> Result<Option<String>> {
        match self.doc.as_table().get(key.key) {
            None => Ok(None),
            Some(raw_value) => match raw_value.as_str() {
                Some(s) => Ok(Some(s.to_owned())),
                None => Err(format_err!(
                    "expected string for {}, found {:?} in {}",
                    key,
                    raw_value,
                    self.path.display(),
                )),
            },
        }
    }

    /// Get an optional integer from our config file.
    fn optional_integer(&self, key: &Key<'_>) -> Result<Option<i64>> {
        match self.doc.as_table().get(key.key) {
            None => Ok(None),
            Some(raw_value) => match raw_value.as_integer() {
                Some(i) => Ok(Some(i)),
                None => Err(format_err!(
                    "expected integer for {}, found {:?} in {}",
                    key,
                    raw_value,
                    self.path.display(),
                )),
            },
        }
    }

    /// Get an array of strings from our config file.
    fn string_array(&self, key: &Key<'_>) -> Result<Vec<String>> {
        let mut values = vec![];
        if let Some(raw_value) = self.doc.as_table().get(key.key) {
            if let Some(raw_array) = raw_value.as_array() {
                for raw_item in raw_array.iter() {
                    if let Some(s) = raw_item.as_str() {
                        values.push(s.to_owned());
                    } else {
                        return Err(format_err!(
                            "expected string, found {:?} in {}",
                            raw_item,
                            self.path.display(),
                        ));
                    }
                }
            } else {
                return Err(format_err!(
                    "expected array, found {:?} in {}",
                    raw_value,
                    self.path.display(),
                ));
            }
        }
        Ok(values)
    }

    /// Get our an array of strings in mutable form.
    fn raw_string_array_mut<'a>(&'a mut self, key: &Key<'_>) -> Result<&'a mut Array> {
        let array_value = self
            .doc
            .as_table_mut()
            .entry(key.key)
            .or_insert(Item::Value(Value::Array(Array::default())));
        match array_value.as_array_mut() {
            Some(array) => Ok(array),
            None => Err(format_err!(
                "expected array for {} in {}",
                key,
                self.path.display(),
            )),
        }
    }

    /// Add a new value to an array of strings, if it's not already there.
    pub fn add_to_string_array(&mut self, key: &Key<'_>, value: &str) -> Result<()> {
        let raw_array = self.raw_string_array_mut(key)?;
        if raw_array.iter().any(|raw_item| raw_item.as_str() == Some(value)) {
            return Ok(());
        }
        raw_array.push(value);
        raw_array.fmt();
        Ok(())
    }

    /// Remove a value from an array of strings, if present. If more
    /// than one copy is present it will remove all.
    pub fn remove_from_string_array(
        &mut self,
        key: &Key<'_>,
        value: &str,
    ) -> Result<()> {
        let raw_array = self.raw_string_array_mut(key)?;
        raw_array.retain(|raw_item| raw_item.as_str() != Some(value));
        raw_array.fmt();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn temp_config() -> tempfile::NamedTempFile {
        tempfile::Builder::new()
            .prefix("ingestr")
            .suffix(".toml")
            .tempfile()
            .unwrap()
    }

    #[test]
    fn masks_can_be_added_and_removed() {
        let temp = temp_config();
        let path = temp.path();
        let mut config = Configuration::from_path(path).unwrap();
        let key = Key::masks();
        assert_eq!(config.masks().unwrap(), Vec::<String>::new());
        config.add_to_string_array(&key, "email:email").unwrap();
        config.add_to_string_array(&key, "email:email").unwrap();
        assert_eq!(config.masks().unwrap(), &["email:email".to_owned()]);
        config.write().unwrap();
        config = Configuration::from_path(path).unwrap();
        assert_eq!(config.masks().unwrap(), &["email:email".to_owned()]);
        config.remove_from_string_array(&key, "email:email").unwrap();
        assert_eq!(config.masks().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn defaults_when_keys_are_missing() {
        let temp = temp_config();
        let config = Configuration::from_path(temp.path()).unwrap();
        assert_eq!(config.aws_region().unwrap(), None);
        assert_eq!(
            config.hubspot_property_chunk_length().unwrap(),
            DEFAULT_HUBSPOT_PROPERTY_CHUNK_LENGTH,
        );
        assert_eq!(config.date_window_days().unwrap(), DEFAULT_DATE_WINDOW_DAYS);
    }

    #[test]
    fn reads_values_and_keeps_comments() {
        let temp = temp_config();
        fs::write(
            temp.path(),
            "# Where we are.\naws_region = \"eu-west-1\"\ndate_window_days = 7\n",
        )
        .unwrap();
        let mut config = Configuration::from_path(temp.path()).unwrap();
        assert_eq!(config.aws_region().unwrap().as_deref(), Some("eu-west-1"));
        assert_eq!(config.date_window_days().unwrap(), 7);

        config.set_aws_region("us-east-2");
        config.write().unwrap();
        let written = fs::read_to_string(temp.path()).unwrap();
        assert!(written.contains("# Where we are."));
        assert!(written.contains("us-east-2"));
    }

    #[test]
    fn rejects_wrong_types() {
        let temp = temp_config();
        fs::write(
            temp.path(),
            "aws_region = 1\nmasks = \"email:email\"\ndate_window_days = 0\n",
        )
        .unwrap();
        let config = Configuration::from_path(temp.path()).unwrap();
        assert!(config.aws_region().is_err());
        assert!(config.masks().is_err());
        assert!(config.date_window_days().is_err());
    }
}
