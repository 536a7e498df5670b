//! Delimited-text snapshot of the directory.

use super::errors::DirectoryResult;
use crate::session::UserAccount;

/// File name offered when saving an export
pub const EXPORT_FILE_NAME: &str = "cs_students.csv";

/// Fixed column header of the snapshot
pub const EXPORT_HEADER: [&str; 10] = [
    "ID",
    "First Name",
    "Last Name",
    "Email",
    "Matric Number",
    "Department",
    "Level",
    "CGPA",
    "Role",
    "Status",
];

/// Serialize accounts as CSV, one row per account under [`EXPORT_HEADER`].
///
/// Missing optional attributes become empty cells.
pub fn export_snapshot<'a, I>(accounts: I) -> DirectoryResult<String>
where
    I: IntoIterator<Item = &'a UserAccount>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for account in accounts {
        let profile = &account.profile;
        let cgpa = profile.cgpa.map(|c| format!("{c:.2}")).unwrap_or_default();
        writer.write_record([
            account.id.as_str(),
            account.first_name.as_str(),
            account.last_name.as_str(),
            account.email.as_str(),
            profile.student_id.as_deref().unwrap_or_default(),
            profile.department.as_deref().unwrap_or_default(),
            profile.level.as_deref().unwrap_or_default(),
            cgpa.as_str(),
            account.role.as_str(),
            account.status.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
