use serde::{Deserialize, Serialize};

/// Platform role. Exactly one per user, set at registration and changed only
/// through the admin role endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Admin,
}

/// Capability set derived from the role once per request. Handlers consume
/// this instead of matching on the raw role at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub manage_content: bool,
    pub manage_users: bool,
    pub view_reports: bool,
    pub view_answer_keys: bool,
    pub enroll_self: bool,
    pub bypass_enrollment: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageContent,
    ManageUsers,
    ViewReports,
    ViewAnswerKeys,
    EnrollSelf,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Student => Self {
                manage_content: false,
                manage_users: false,
                view_reports: false,
                view_answer_keys: false,
                enroll_self: true,
                bypass_enrollment: false,
            },
            Role::Admin => Self {
                manage_content: true,
                manage_users: true,
                view_reports: true,
                view_answer_keys: true,
                enroll_self: false,
                bypass_enrollment: true,
            },
        }
    }

    pub fn allows(&self, cap: Capability) -> bool {
        match cap {
            Capability::ManageContent => self.manage_content,
            Capability::ManageUsers => self.manage_users,
            Capability::ViewReports => self.view_reports,
            Capability::ViewAnswerKeys => self.view_answer_keys,
            Capability::EnrollSelf => self.enroll_self,
        }
    }
}

pub(crate) fn denial(cap: Capability) -> &'static str {
    match cap {
        Capability::ManageContent => "Only admins can manage content",
        Capability::ManageUsers => "Only admins can manage users",
        Capability::ViewReports => "Only admins can view reports",
        Capability::ViewAnswerKeys => "Only admins can view answer keys",
        Capability::EnrollSelf => "Only students can enroll",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_capabilities() {
        let caps = Capabilities::for_role(Role::Student);
        assert!(caps.allows(Capability::EnrollSelf));
        assert!(!caps.allows(Capability::ManageContent));
        assert!(!caps.allows(Capability::ManageUsers));
        assert!(!caps.allows(Capability::ViewReports));
        assert!(!caps.allows(Capability::ViewAnswerKeys));
        assert!(!caps.bypass_enrollment);
    }

    #[test]
    fn admin_capabilities() {
        let caps = Capabilities::for_role(Role::Admin);
        assert!(caps.allows(Capability::ManageContent));
        assert!(caps.allows(Capability::ManageUsers));
        assert!(caps.allows(Capability::ViewReports));
        assert!(caps.allows(Capability::ViewAnswerKeys));
        assert!(caps.bypass_enrollment);
        // Enrollment is a student action; admins enroll users via the admin path.
        assert!(!caps.allows(Capability::EnrollSelf));
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"STUDENT\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }
}
