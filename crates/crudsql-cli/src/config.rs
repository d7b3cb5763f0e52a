use crate::cli::GlobalArgs;
use crudsql::{ConnectionDescriptor, DEFAULT_PORT, DbOptions, ValueMode};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub options: OptionsConfig,
}

/// Either `url`, or the individual connection parts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsConfig {
    #[serde(default)]
    pub debug: bool,
    pub value_mode: Option<ValueMode>,
}

/// Everything needed to build a `CrudDb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub descriptor: ConnectionDescriptor,
    pub options: DbOptions,
}

impl ConfigFile {
    /// Read and expand a config file.
    ///
    /// A missing file is only an error when it was asked for explicitly.
    pub fn load(path: &Path, required: bool) -> anyhow::Result<Self> {
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
        Self::parse(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e:#}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        let db = &mut self.database;
        for field in [
            &mut db.url,
            &mut db.host,
            &mut db.user,
            &mut db.password,
            &mut db.name,
        ] {
            if let Some(v) = field.as_mut() {
                *v = expand_env_vars(v)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        let db = &self.database;
        if db.url.is_some() && (db.host.is_some() || db.name.is_some()) {
            anyhow::bail!("database.url cannot be combined with database.host/database.name");
        }
        if let Some(url) = &db.url {
            if url.trim().is_empty() {
                anyhow::bail!("database.url must not be empty");
            }
        }
        Ok(())
    }

    /// Descriptor from the `[database]` table, if it names one.
    fn descriptor(&self) -> anyhow::Result<Option<ConnectionDescriptor>> {
        let db = &self.database;
        if let Some(url) = &db.url {
            return Ok(Some(ConnectionDescriptor::from_url(url)?));
        }
        if db.host.is_none() && db.user.is_none() && db.name.is_none() {
            return Ok(None);
        }

        let required = |value: &Option<String>, key: &str| {
            value
                .clone()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("database.{key} is required"))
        };
        Ok(Some(ConnectionDescriptor::new(
            required(&db.host, "host")?,
            db.port.unwrap_or(DEFAULT_PORT),
            required(&db.user, "user")?,
            db.password.clone().unwrap_or_default(),
            required(&db.name, "name")?,
        )))
    }
}

/// Combine flags, config file and environment, in that order of precedence.
pub fn resolve(global: &GlobalArgs) -> anyhow::Result<Settings> {
    let file = ConfigFile::load(&global.config, global.config_explicit)?;
    resolve_with(global, &file, ConnectionDescriptor::from_env)
}

fn resolve_with(
    global: &GlobalArgs,
    file: &ConfigFile,
    from_env: impl FnOnce() -> crudsql::DbResult<ConnectionDescriptor>,
) -> anyhow::Result<Settings> {
    let descriptor = match &global.database {
        Some(url) => ConnectionDescriptor::from_url(url)?,
        None => match file.descriptor()? {
            Some(descriptor) => descriptor,
            None => from_env().map_err(|e| {
                anyhow::anyhow!(
                    "no database configured (use --database, a config file or DATABASE_URL): {e}"
                )
            })?,
        },
    };

    let mode = if global.inline {
        ValueMode::Inline
    } else {
        file.options.value_mode.unwrap_or_default()
    };
    let options = DbOptions::new()
        .value_mode(mode)
        .debug(global.debug || file.options.debug);

    Ok(Settings {
        descriptor,
        options,
    })
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    expand_vars_with(input, |key| std::env::var(key).ok())
}

fn expand_vars_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}}}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = lookup(&key)
                .ok_or_else(|| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn no_env() -> crudsql::DbResult<ConnectionDescriptor> {
        Err(crudsql::DbError::connection("missing environment variable CRUDSQL_HOST"))
    }

    #[test]
    fn expands_variables() {
        let lookup = |key: &str| (key == "PGPASS").then(|| "s3cret".to_string());
        assert_eq!(
            expand_vars_with("postgres://app:${PGPASS}@db/shop", lookup).unwrap(),
            "postgres://app:s3cret@db/shop"
        );
        assert_eq!(expand_vars_with("no $vars {here}", lookup).unwrap(), "no $vars {here}");
        assert!(expand_vars_with("${MISSING}", lookup).is_err());
        assert!(expand_vars_with("${PGPASS", lookup).is_err());
        assert!(expand_vars_with("${}", lookup).is_err());
    }

    #[test]
    fn parses_parts_and_options() {
        let file = ConfigFile::parse(
            r#"
            [database]
            host = "db.local"
            user = "app"
            password = "pw"
            name = "shop"

            [options]
            debug = true
            value_mode = "inline"
            "#,
        )
        .unwrap();

        let settings = resolve_with(&GlobalArgs::default(), &file, no_env).unwrap();
        assert_eq!(settings.descriptor.dsn(), "app:pw@db.local:5432/shop");
        assert_eq!(settings.options.mode(), ValueMode::Inline);
        assert!(settings.options.is_debug());
    }

    #[test]
    fn flags_override_file() {
        let file = ConfigFile::parse(
            r#"
            [database]
            url = "postgres://file@filehost/filedb"
            "#,
        )
        .unwrap();
        let global = GlobalArgs {
            database: Some("postgres://flag@flaghost:6000/flagdb".to_string()),
            inline: true,
            ..GlobalArgs::default()
        };

        let settings = resolve_with(&global, &file, no_env).unwrap();
        assert_eq!(settings.descriptor.host(), "flaghost");
        assert_eq!(settings.descriptor.port(), 6000);
        assert_eq!(settings.options.mode(), ValueMode::Inline);
        assert!(!settings.options.is_debug());

        let settings = resolve_with(&GlobalArgs::default(), &file, no_env).unwrap();
        assert_eq!(settings.descriptor.host(), "filehost");
        assert_eq!(settings.options.mode(), ValueMode::Bind);
    }

    #[test]
    fn falls_back_to_environment() {
        let settings = resolve_with(&GlobalArgs::default(), &ConfigFile::default(), || {
            Ok(ConnectionDescriptor::new("envhost", 5432, "u", "", "d"))
        })
        .unwrap();
        assert_eq!(settings.descriptor.host(), "envhost");

        let err = resolve_with(&GlobalArgs::default(), &ConfigFile::default(), no_env).unwrap_err();
        assert!(format!("{err:#}").contains("no database configured"));
    }

    #[test]
    fn rejects_invalid_files() {
        assert!(ConfigFile::parse("[database]\nurl = \"\"").is_err());
        assert!(ConfigFile::parse("[database]\nurl = \"postgres://a@h/d\"\nhost = \"h\"").is_err());
        assert!(ConfigFile::parse("[options]\nvalue_mode = \"literal\"").is_err());
        assert!(ConfigFile::parse("[unknown]\nx = 1").is_err());

        let file = ConfigFile::parse("[database]\nhost = \"h\"").unwrap();
        assert!(resolve_with(&GlobalArgs::default(), &file, no_env).is_err());
    }

    #[test]
    fn missing_default_config_is_not_an_error() {
        let path = PathBuf::from("definitely-not-here/crudsql.toml");
        assert!(ConfigFile::load(&path, false).unwrap().database.url.is_none());
        assert!(ConfigFile::load(&path, true).is_err());
    }
}
