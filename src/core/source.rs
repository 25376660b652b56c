//! MW-011: Module source descriptors.
//!
//! A source says where a module's code lives. It is fixed when the module is
//! loaded and never rewritten afterwards.

use super::digest::BuildDefinition;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a module's code comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleSource {
    /// A directory on the host, relative to a context directory
    Local {
        context_dir: String,
        #[serde(default)]
        subpath: String,
    },
    /// A git repository at a version, pinned to a commit
    Git {
        clone_ref: String,
        #[serde(default)]
        version: String,
        #[serde(default)]
        commit: String,
        #[serde(default)]
        subpath: String,
    },
    /// Opaque content identified only by digest
    Dir {
        digest: String,
        #[serde(default)]
        subpath: String,
    },
}

/// A printable, re-loadable reference to a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRef {
    pub reference: String,
    pub pin: String,
}

const GIT_HOSTS: &[&str] = &["github.com/", "gitlab.com/", "bitbucket.org/"];

impl ModuleSource {
    pub fn local(context_dir: &str, subpath: &str) -> Self {
        Self::Local {
            context_dir: context_dir.to_string(),
            subpath: subpath.to_string(),
        }
    }

    pub fn git(clone_ref: &str, version: &str, commit: &str, subpath: &str) -> Self {
        Self::Git {
            clone_ref: clone_ref.to_string(),
            version: version.to_string(),
            commit: commit.to_string(),
            subpath: subpath.to_string(),
        }
    }

    pub fn dir(digest: &str, subpath: &str) -> Self {
        Self::Dir {
            digest: digest.to_string(),
            subpath: subpath.to_string(),
        }
    }

    /// Parse a compact source reference.
    ///
    /// - `blake3:<hex>` is opaque content
    /// - `host/owner/repo[/sub/path][@version]` on a known git host, or any
    ///   `scheme://` URL, is a git source; `pin` becomes the commit
    /// - anything else is a path relative to `context_dir`
    pub fn parse(reference: &str, pin: Option<&str>, context_dir: &Path) -> Self {
        let reference = reference.trim();
        if reference.starts_with("blake3:") {
            return Self::dir(reference, "");
        }

        let is_git = reference.contains("://") || GIT_HOSTS.iter().any(|h| reference.starts_with(h));
        if is_git {
            let (path, version) = match reference.rsplit_once('@') {
                Some((path, version)) => (path, version),
                None => (reference, ""),
            };
            let (scheme, bare) = match path.split_once("://") {
                Some((scheme, rest)) => (Some(scheme), rest),
                None => (None, path),
            };
            // host/owner/repo, the rest is the subpath
            let mut parts = bare.splitn(4, '/');
            let repo: Vec<&str> = parts.by_ref().take(3).collect();
            let subpath = parts.next().unwrap_or("");
            let repo = repo.join("/");
            let clone_ref = match scheme {
                Some(scheme) => format!("{}://{}", scheme, repo),
                None => repo,
            };
            return Self::git(&clone_ref, version, pin.unwrap_or(""), subpath);
        }

        let subpath = reference.trim_start_matches("./");
        let subpath = if subpath.is_empty() { "." } else { subpath };
        Self::local(&context_dir.to_string_lossy(), subpath)
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Git { .. } => "git",
            Self::Dir { .. } => "dir",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }

    /// Path of the module root within its source tree.
    pub fn subpath(&self) -> &str {
        match self {
            Self::Local { subpath, .. } | Self::Git { subpath, .. } | Self::Dir { subpath, .. } => {
                subpath
            }
        }
    }

    pub fn reference(&self) -> SourceRef {
        match self {
            Self::Local {
                context_dir,
                subpath,
            } => SourceRef {
                reference: join_subpath(context_dir, subpath),
                pin: String::new(),
            },
            Self::Git {
                clone_ref,
                version,
                commit,
                subpath,
            } => {
                let mut reference = join_subpath(clone_ref, subpath);
                if !version.is_empty() {
                    reference.push('@');
                    reference.push_str(version);
                }
                SourceRef {
                    reference,
                    pin: commit.clone(),
                }
            }
            Self::Dir { digest, .. } => SourceRef {
                reference: digest.clone(),
                pin: String::new(),
            },
        }
    }

    /// Build steps needed to materialize the source.
    pub fn build_definitions(&self) -> Vec<BuildDefinition> {
        let def = match self {
            Self::Local {
                context_dir,
                subpath,
            } => BuildDefinition::new("local", &[context_dir.as_str(), subpath.as_str()]),
            Self::Git {
                clone_ref,
                commit,
                subpath,
                ..
            } => BuildDefinition::new("git", &[clone_ref.as_str(), commit.as_str(), subpath.as_str()]),
            Self::Dir { digest, subpath } => {
                BuildDefinition::new("dir", &[digest.as_str(), subpath.as_str()])
            }
        };
        vec![def]
    }
}

/// Join `subpath` onto `base`, treating `""` and `"."` as the base itself.
pub(crate) fn join_subpath(base: &str, subpath: &str) -> String {
    let subpath = subpath.trim_start_matches("./").trim_matches('/');
    if subpath.is_empty() || subpath == "." {
        return base.to_string();
    }
    if base.is_empty() || base == "." {
        return subpath.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), subpath)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mw011_parse_local() {
        let src = ModuleSource::parse("./greet", None, Path::new("/work"));
        assert_eq!(src, ModuleSource::local("/work", "greet"));
        assert!(src.is_local());
        assert_eq!(src.reference().reference, "/work/greet");

        let root = ModuleSource::parse(".", None, Path::new("/work"));
        assert_eq!(root.subpath(), ".");
        assert_eq!(root.reference().reference, "/work");
    }

    #[test]
    fn test_mw011_parse_git_with_version() {
        let src = ModuleSource::parse(
            "github.com/acme/mods/tools/lint@v1.2.0",
            Some("abc123"),
            Path::new("/work"),
        );
        assert_eq!(
            src,
            ModuleSource::git("github.com/acme/mods", "v1.2.0", "abc123", "tools/lint")
        );
        let r = src.reference();
        assert_eq!(r.reference, "github.com/acme/mods/tools/lint@v1.2.0");
        assert_eq!(r.pin, "abc123");
    }

    #[test]
    fn test_mw011_parse_git_url_without_subpath() {
        let src = ModuleSource::parse("https://example.com/acme/repo", None, Path::new("/"));
        assert_eq!(src.kind_label(), "git");
        assert_eq!(src.reference().reference, "https://example.com/acme/repo");
        assert_eq!(src.subpath(), "");
    }

    #[test]
    fn test_mw011_parse_dir_digest() {
        let digest = crate::core::digest::hash_string("content");
        let src = ModuleSource::parse(&digest, None, Path::new("/work"));
        assert_eq!(src.kind_label(), "dir");
        assert_eq!(src.reference().reference, digest);
    }

    #[test]
    fn test_mw011_build_definitions_differ_by_commit() {
        let a = ModuleSource::git("github.com/a/b", "v1", "c1", "");
        let b = ModuleSource::git("github.com/a/b", "v1", "c2", "");
        assert_ne!(a.build_definitions(), b.build_definitions());
        assert_eq!(a.build_definitions()[0].op, "git");
    }

    #[test]
    fn test_mw011_join_subpath() {
        assert_eq!(join_subpath("mods", "main.go"), "mods/main.go");
        assert_eq!(join_subpath(".", "main.go"), "main.go");
        assert_eq!(join_subpath("", "main.go"), "main.go");
        assert_eq!(join_subpath("mods", "."), "mods");
    }
}
