//! Collection <-> slot text.
//!
//! A collection is stored as a JSON array in display order. Decoding checks
//! the shape with serde, then enforces id uniqueness and the kind's own
//! validation rules, so a slot that was hand-edited or written by a
//! different schema comes back as a `DecodeError` instead of bad records.

use std::collections::HashSet;

use models::Entity;

use crate::errors::{DecodeError, ServiceError};

pub fn encode<E: Entity>(records: &[E]) -> Result<String, ServiceError> {
    Ok(serde_json::to_string(records)?)
}

pub fn decode<E: Entity>(raw: &str) -> Result<Vec<E>, DecodeError> {
    let records: Vec<E> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id()) {
            return Err(DecodeError::DuplicateId(record.id().to_string()));
        }
        record.validate().map_err(|e| DecodeError::Invalid {
            id: record.id().to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Department, Service, User};

    #[test]
    fn seeds_round_trip() -> anyhow::Result<()> {
        let departments = Department::seed();
        assert_eq!(decode::<Department>(&encode(&departments)?)?, departments);
        let services = Service::seed();
        assert_eq!(decode::<Service>(&encode(&services)?)?, services);
        let users = User::seed();
        assert_eq!(decode::<User>(&encode(&users)?)?, users);
        Ok(())
    }

    #[test]
    fn created_and_patched_records_round_trip() -> anyhow::Result<()> {
        use models::department::{DepartmentPatch, NewDepartment};
        use models::service::{NewService, ServicePatch};
        use models::user::{NewUser, UserPatch};

        let id = || uuid::Uuid::new_v4().to_string();

        let mut lawns = Department::from_draft(
            id(),
            NewDepartment { name: "Entretien des pelouses".into(), head: "Zoë Wanjikũ".into(), members: 0 },
        )?;
        lawns.apply_patch(DepartmentPatch { head: Some("  Ngũgĩ wa Thiong'o ".into()), ..Default::default() });
        let mut departments = vec![lawns];
        departments.extend(Department::seed());
        assert_eq!(decode::<Department>(&encode(&departments)?)?, departments);

        let mut paving = Service::from_draft(
            id(),
            NewService { src: "data:image/jpeg;base64,/9j/4AAQ".into(), alt: "Pavés \"autobloquants\" 🧱".into() },
        )?;
        paving.apply_patch(ServicePatch { src: Some("images/cabro.png".into()), ..Default::default() });
        let services = vec![paving, Service::from_draft(id(), NewService { src: "x.png".into(), alt: "Test Service".into() })?];
        assert_eq!(decode::<Service>(&encode(&services)?)?, services);

        let mut dana = User::from_draft(
            id(),
            NewUser {
                name: "Dana Ōkubo".into(),
                email: "dana@example.com".into(),
                role: "Contributor".into(),
                photo: Some("data:image/png;base64,iVBORw0KGgo=".into()),
            },
        )?;
        dana.apply_patch(UserPatch { role: Some("Editor".into()), ..Default::default() });
        let mut cleared = dana.clone();
        cleared.id = id();
        cleared.apply_patch(UserPatch { photo: Some(String::new()), ..Default::default() });
        let users = vec![dana, cleared];
        let decoded = decode::<User>(&encode(&users)?)?;
        assert_eq!(decoded, users);
        assert!(decoded[0].photo.is_some());
        assert!(decoded[1].photo.is_none());
        Ok(())
    }

    #[test]
    fn empty_collection_round_trips() -> anyhow::Result<()> {
        let raw = encode::<Service>(&[])?;
        assert_eq!(raw, "[]");
        assert!(decode::<Service>(&raw)?.is_empty());
        Ok(())
    }

    #[test]
    fn stored_format_matches_plain_json_arrays() -> anyhow::Result<()> {
        let raw = r#"[{"id":"1","name":"ICT Department","head":"John Smith","members":5}]"#;
        let decoded = decode::<Department>(raw)?;
        assert_eq!(decoded[0].members, 5);
        assert_eq!(encode(&decoded)?, raw);
        Ok(())
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(decode::<Service>("{not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode::<Service>(r#"{"id":"1"}"#), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn type_mismatches_are_malformed() {
        let negative = r#"[{"id":"1","name":"HR","head":"Alice","members":-2}]"#;
        assert!(matches!(decode::<Department>(negative), Err(DecodeError::Malformed(_))));
        let bad_role = r#"[{"id":"1","name":"A","email":"a@x","role":"Owner"}]"#;
        assert!(matches!(decode::<User>(bad_role), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let raw = r#"[{"id":"7","src":"a.png","alt":"A"},{"id":"7","src":"b.png","alt":"B"}]"#;
        assert!(matches!(decode::<Service>(raw), Err(DecodeError::DuplicateId(id)) if id == "7"));
    }

    #[test]
    fn invalid_records_rejected() {
        let raw = r#"[{"id":"1","src":"a.png","alt":"  "}]"#;
        assert!(matches!(decode::<Service>(raw), Err(DecodeError::Invalid { .. })));
    }
}
