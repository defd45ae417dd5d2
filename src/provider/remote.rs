/// Owner (or group path) and repository name of a hosted project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProject {
    pub owner: String,
    pub repo: String,
}

impl RemoteProject {
    /// `owner/repo` path as used by the hosting APIs
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Extract owner and repository from a remote URL.
///
/// Supports:
/// - `git@host:owner/repo.git`
/// - `ssh://git@host[:port]/owner/repo.git`
/// - `https://host/owner/repo` (with or without `.git`)
///
/// GitLab subgroups are kept in the owner, e.g. `group/sub`.
pub fn parse_remote_url(url: &str) -> Option<RemoteProject> {
    let url = url.trim();

    let path = if let Some((_, rest)) = url.split_once("://") {
        // Drop the authority part
        rest.split_once('/')?.1
    } else if let Some((authority, rest)) = url.split_once(':') {
        if !authority.contains('@') && authority.contains('/') {
            return None;
        }
        rest
    } else {
        return None;
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.rsplit_once('/')?;

    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some(RemoteProject {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(url: &str) -> (String, String) {
        let project = parse_remote_url(url).unwrap();
        (project.owner, project.repo)
    }

    #[test]
    fn test_scp_style_url() {
        assert_eq!(
            parsed("git@github.com:Maahsome/changelog-pr.git"),
            ("Maahsome".to_string(), "changelog-pr".to_string())
        );
    }

    #[test]
    fn test_https_url() {
        assert_eq!(
            parsed("https://github.com/Maahsome/changelog-pr.git"),
            ("Maahsome".to_string(), "changelog-pr".to_string())
        );
        assert_eq!(
            parsed("https://gitlab.example.com/team/app"),
            ("team".to_string(), "app".to_string())
        );
    }

    #[test]
    fn test_ssh_url_with_port_and_subgroup() {
        assert_eq!(
            parsed("ssh://git@gitlab.example.com:2222/group/sub/app.git"),
            ("group/sub".to_string(), "app".to_string())
        );
    }

    #[test]
    fn test_invalid_urls() {
        assert!(parse_remote_url("not a url").is_none());
        assert!(parse_remote_url("https://github.com/only-owner").is_none());
        assert!(parse_remote_url("/local/path/repo").is_none());
    }

    #[test]
    fn test_project_path() {
        let project = parse_remote_url("git@gitlab.com:group/sub/app.git").unwrap();
        assert_eq!(project.path(), "group/sub/app");
    }
}
