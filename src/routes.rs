use crate::clock::RecordId;
use crate::session::Session;
use crate::user::Role;

pub const LOGIN_PATH: &str = "/login";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    /// Role area, `section` is empty for the overview page.
    Dashboard { role: Role, section: String },
    Assignment(RecordId),
    Collaboration(RecordId),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let mut parts = trimmed.trim_start_matches('/').splitn(2, '/');
        let head = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("");

        match head {
            "" => Route::Root,
            "login" if rest.is_empty() => Route::Login,
            "assignment" => rest
                .parse()
                .map(Route::Assignment)
                .unwrap_or_else(|_| Route::NotFound(path.to_string())),
            "collaboration" => rest
                .parse()
                .map(Route::Collaboration)
                .unwrap_or_else(|_| Route::NotFound(path.to_string())),
            "student" | "professor" | "mentor" => match head.parse::<Role>() {
                Ok(role) => Route::Dashboard {
                    role,
                    section: rest.to_string(),
                },
                Err(_) => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(String),
    NotFound,
}

/// Decides what the view layer may show for `route` given the session.
pub fn guard(route: Route, session: &Session) -> RouteDecision {
    match route {
        Route::Root => RouteDecision::Redirect(LOGIN_PATH.to_string()),
        Route::Login => RouteDecision::Render(Route::Login),
        Route::NotFound(_) => RouteDecision::NotFound,
        Route::Dashboard { role, section } => match session.role() {
            None => RouteDecision::Redirect(LOGIN_PATH.to_string()),
            Some(own) if own != role => RouteDecision::Redirect(own.dashboard_path()),
            Some(own) => {
                if navigation(own).iter().any(|item| item.href == section_path(own, &section)) {
                    RouteDecision::Render(Route::Dashboard { role, section })
                } else {
                    RouteDecision::NotFound
                }
            }
        },
        detail => {
            if session.is_logged_in() {
                RouteDecision::Render(detail)
            } else {
                RouteDecision::Redirect(LOGIN_PATH.to_string())
            }
        }
    }
}

fn section_path(role: Role, section: &str) -> String {
    if section.is_empty() {
        role.dashboard_path()
    } else {
        format!("{}/{}", role.dashboard_path(), section)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub name: &'static str,
    pub href: String,
}

/// Sidebar entries for a role, overview first.
pub fn navigation(role: Role) -> Vec<NavItem> {
    let sections: &[(&'static str, &str)] = match role {
        Role::Student => &[
            ("Assignments", "assignments"),
            ("Collaboration", "collaboration"),
            ("Leaderboard", "leaderboard"),
            ("Profile", "profile"),
        ],
        Role::Professor => &[
            ("Create Assignment", "create-assignment"),
            ("Manage Assignments", "manage-assignments"),
            ("Analytics", "analytics"),
            ("Profile", "profile"),
        ],
        Role::Mentor => &[
            ("Post Project", "post-project"),
            ("Mentees", "mentees"),
            ("Certificates", "certificates"),
            ("Profile", "profile"),
        ],
    };
    let mut items = vec![NavItem {
        name: "Dashboard",
        href: role.dashboard_path(),
    }];
    items.extend(sections.iter().map(|&(name, section)| NavItem {
        name,
        href: section_path(role, section),
    }));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn logged_in(role: Role) -> Session {
        Session::LoggedIn(User {
            id: "user-1".to_string(),
            email: "ada@uni.edu".to_string(),
            name: "ada".to_string(),
            avatar: "a".to_string(),
            role,
            xp: 0,
            level: 0,
            badges: BTreeSet::new(),
            institution: "Demo University".to_string(),
            joined_at: Utc::now(),
        })
    }

    #[test]
    fn test_parse_table() {
        let table = vec![
            ("/", Route::Root),
            ("", Route::Root),
            ("/login", Route::Login),
            (
                "/student",
                Route::Dashboard {
                    role: Role::Student,
                    section: "".to_string(),
                },
            ),
            (
                "/professor/create-assignment/",
                Route::Dashboard {
                    role: Role::Professor,
                    section: "create-assignment".to_string(),
                },
            ),
            ("/assignment/42", Route::Assignment(42)),
            ("/collaboration/7", Route::Collaboration(7)),
            ("/assignment/abc", Route::NotFound("/assignment/abc".to_string())),
            ("/admin", Route::NotFound("/admin".to_string())),
        ];
        for (i, (path, expected)) in table.into_iter().enumerate() {
            assert_eq!(Route::parse(path), expected, "row {}", i);
        }
    }

    #[test]
    fn test_guard_table() {
        let student = logged_in(Role::Student);
        let professor = logged_in(Role::Professor);
        let logged_out = Session::LoggedOut;
        let table = vec![
            ("/", &logged_out, RouteDecision::Redirect("/login".to_string())),
            ("/login", &logged_out, RouteDecision::Render(Route::Login)),
            ("/student", &logged_out, RouteDecision::Redirect("/login".to_string())),
            ("/assignment/1", &logged_out, RouteDecision::Redirect("/login".to_string())),
            ("/assignment/1", &student, RouteDecision::Render(Route::Assignment(1))),
            ("/professor", &student, RouteDecision::Redirect("/student".to_string())),
            ("/student/leaderboard", &professor, RouteDecision::Redirect("/professor".to_string())),
            ("/student/nope", &student, RouteDecision::NotFound),
            ("/nowhere", &student, RouteDecision::NotFound),
        ];
        for (i, (path, session, expected)) in table.into_iter().enumerate() {
            assert_eq!(guard(Route::parse(path), session), expected, "row {}", i);
        }

        match guard(Route::parse("/student/leaderboard"), &student) {
            RouteDecision::Render(Route::Dashboard { role, section }) => {
                assert_eq!(role, Role::Student);
                assert_eq!(section, "leaderboard");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_navigation_per_role() {
        let hrefs: Vec<String> = navigation(Role::Mentor).into_iter().map(|i| i.href).collect();
        assert_eq!(
            hrefs,
            vec![
                "/mentor",
                "/mentor/post-project",
                "/mentor/mentees",
                "/mentor/certificates",
                "/mentor/profile"
            ]
        );
        assert_eq!(navigation(Role::Professor)[1].name, "Create Assignment");
    }
}
