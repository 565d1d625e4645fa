use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One cast vote. At most one record exists per `(poll_id, voter_id)`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoteRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub poll_id: ObjectId,

    pub voter_id: ObjectId,

    pub option_id: ObjectId,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub cast_at: DateTime<Utc>,
}

impl VoteRecord {
    pub fn new(poll_id: ObjectId, voter_id: ObjectId, option_id: ObjectId) -> Self {
        Self {
            id: ObjectId::new(),
            poll_id,
            voter_id,
            option_id,
            cast_at: Utc::now(),
        }
    }
}
