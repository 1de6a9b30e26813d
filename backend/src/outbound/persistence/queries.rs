//! Builders for quest filter, update and aggregation documents.
//!
//! Dates are stored as `YYYY-MM-DD` strings, so lexicographic `$lte`/`$gte`
//! comparisons order them chronologically.

use mongodb::bson::{Bson, Document, doc};

use crate::domain::{QuestFilter, QuestId, QuestPatch, QuestStatus, QuestTotals};

/// Match one quest by its public id.
pub(crate) fn by_quest_id(id: &QuestId) -> Document {
    doc! { "id": id.as_ref() }
}

/// Newest `created_at` first.
pub(crate) fn newest_first() -> Document {
    doc! { "created_at": -1 }
}

/// Translate list filters into a `find` filter.
pub(crate) fn filter_document(filter: &QuestFilter) -> Document {
    let mut query = Document::new();
    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }
    if let Some(subject) = &filter.subject {
        query.insert("subject", subject.as_str());
    }
    if let Some(visibility) = filter.visibility {
        query.insert("visibility", visibility.as_str());
    }

    let mut deadline = Document::new();
    if let Some(before) = filter.deadline_before {
        deadline.insert("$lte", before.to_string());
    }
    if let Some(after) = filter.deadline_after {
        deadline.insert("$gte", after.to_string());
    }
    if !deadline.is_empty() {
        query.insert("deadline", deadline);
    }
    query
}

/// `$set` body for the fields present in `patch`.
pub(crate) fn set_document(patch: &QuestPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert("title", title.as_ref());
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.as_str());
    }
    if let Some(subject) = &patch.subject {
        set.insert("subject", subject.as_ref());
    }
    if let Some(topic) = &patch.topic {
        set.insert("topic", topic.as_str());
    }
    if let Some(effort_type) = &patch.effort_type {
        set.insert("effort_type", effort_type.as_str());
    }
    if let Some(minutes) = patch.studied_minutes {
        set.insert("studied_minutes", minutes.get());
    }
    if let Some(minutes) = patch.suggested_minutes {
        set.insert("suggested_minutes", minutes.get());
    }
    if let Some(deadline) = patch.deadline {
        set.insert("deadline", deadline.to_string());
    }
    if let Some(visibility) = patch.visibility {
        set.insert("visibility", visibility.as_str());
    }
    if let Some(status) = patch.status {
        set.insert("status", status.as_str());
    }
    set
}

fn count_status(status: QuestStatus) -> Document {
    doc! {
        "$sum": { "$cond": [{ "$eq": ["$status", status.as_str()] }, 1, 0] }
    }
}

/// Single `$group` stage producing every total in one pass.
pub(crate) fn totals_pipeline() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": Bson::Null,
            "total": { "$sum": 1 },
            "prepare": count_status(QuestStatus::Prepare),
            "active": count_status(QuestStatus::Active),
            "done": count_status(QuestStatus::Done),
            "studied_minutes": { "$sum": "$studied_minutes" },
            "suggested_minutes": { "$sum": "$suggested_minutes" },
        }
    }]
}

/// Unexpected shape in an aggregation result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("aggregation field `{field}` is not an integer")]
pub(crate) struct TotalsShapeError {
    field: &'static str,
}

fn integer(group: &Document, field: &'static str) -> Result<i64, TotalsShapeError> {
    match group.get(field) {
        None => Ok(0),
        Some(Bson::Int32(value)) => Ok(i64::from(*value)),
        Some(Bson::Int64(value)) => Ok(*value),
        Some(_) => Err(TotalsShapeError { field }),
    }
}

fn count(group: &Document, field: &'static str) -> Result<u64, TotalsShapeError> {
    u64::try_from(integer(group, field)?).map_err(|_| TotalsShapeError { field })
}

/// Read the `$group` output. An empty collection yields no document and
/// therefore all-zero totals.
pub(crate) fn totals_from_group(group: Option<&Document>) -> Result<QuestTotals, TotalsShapeError> {
    let Some(group) = group else {
        return Ok(QuestTotals::default());
    };
    Ok(QuestTotals {
        total: count(group, "total")?,
        prepare: count(group, "prepare")?,
        active: count(group, "active")?,
        done: count(group, "done")?,
        studied_minutes: integer(group, "studied_minutes")?,
        suggested_minutes: integer(group, "suggested_minutes")?,
    })
}
