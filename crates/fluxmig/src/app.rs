use std::fmt;
use std::str::FromStr;

/// An application identifier such as `media/sonarr/app`.
///
/// The first path segment is the Kubernetes namespace and the second one is
/// the application name; any further segments only locate the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRef {
    pub path: String,
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppRefError {
    #[error("application path '{0}' must look like <namespace>/<name>[/...]")]
    TooFewSegments(String),

    #[error("application path '{path}' has an invalid segment '{segment}'")]
    InvalidSegment { path: String, segment: String },
}

impl FromStr for AppRef {
    type Err = AppRefError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.strip_suffix('/').unwrap_or(path);
        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 2 {
            return Err(AppRefError::TooFewSegments(path.to_string()));
        }

        // The path is joined onto the apps directory, so it must stay inside it
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(AppRefError::InvalidSegment {
                path: path.to_string(),
                segment: bad.to_string(),
            });
        }

        Ok(Self {
            path: path.to_string(),
            namespace: segments[0].to_string(),
            name: segments[1].to_string(),
        })
    }
}

impl fmt::Display for AppRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_namespace_and_name() {
        let app: AppRef = "media/sonarr/app".parse().unwrap();
        assert_eq!(app.namespace, "media");
        assert_eq!(app.name, "sonarr");
        assert_eq!(app.path, "media/sonarr/app");
        assert_eq!(app.to_string(), "media/sonarr");
    }

    #[test]
    fn two_segments_are_enough() {
        let app: AppRef = "home/home-assistant".parse().unwrap();
        assert_eq!(app.namespace, "home");
        assert_eq!(app.name, "home-assistant");
    }

    #[test]
    fn accepts_one_trailing_slash() {
        let app: AppRef = "media/sonarr/app/".parse().unwrap();
        assert_eq!(app.path, "media/sonarr/app");
        assert_eq!(app.namespace, "media");
        assert_eq!(app.name, "sonarr");

        assert!("media/sonarr/app//".parse::<AppRef>().is_err());
    }

    #[test]
    fn rejects_single_segment() {
        assert_eq!(
            "sonarr".parse::<AppRef>(),
            Err(AppRefError::TooFewSegments("sonarr".to_string()))
        );
    }

    #[test]
    fn rejects_escaping_segments() {
        for path in ["/media/sonarr", "media//app", "../media/sonarr", "media/./app"] {
            assert!(
                matches!(
                    path.parse::<AppRef>(),
                    Err(AppRefError::InvalidSegment { .. })
                ),
                "{path} should be rejected"
            );
        }
    }
}
