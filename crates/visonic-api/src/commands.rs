// Panel commands
//
// Arm and disarm POST `{"partition": ...}` to a per-mode endpoint.
// Any 2xx answer is success whatever its body; the resulting state is
// observed on the next status poll.

use chrono::NaiveDateTime;
use tracing::info;

use crate::client::VisonicClient;
use crate::error::Error;
use crate::models::{PartitionCommand, SetDateTime};

impl VisonicClient {
    /// `POST /arm_home`
    pub async fn arm_home(&self) -> Result<(), Error> {
        self.partition_command("arm_home").await
    }

    /// `POST /arm_home_instant`
    pub async fn arm_home_instant(&self) -> Result<(), Error> {
        self.partition_command("arm_home_instant").await
    }

    /// `POST /arm_away`
    pub async fn arm_away(&self) -> Result<(), Error> {
        self.partition_command("arm_away").await
    }

    /// `POST /arm_away_instant`
    pub async fn arm_away_instant(&self) -> Result<(), Error> {
        self.partition_command("arm_away_instant").await
    }

    /// `POST /disarm`
    pub async fn disarm(&self) -> Result<(), Error> {
        self.partition_command("disarm").await
    }

    /// Set the panel clock.
    ///
    /// `POST /set_date_time` with `{"time": "YYYYMMDDTHHMMSS"}`
    pub async fn set_date_time(&self, time: NaiveDateTime) -> Result<(), Error> {
        let url = self.api_url("set_date_time")?;
        let body = SetDateTime {
            time: time.format("%Y%m%dT%H%M%S").to_string(),
        };
        info!(time = %body.time, "setting panel clock");
        self.send_post_unit(url, &body, true).await
    }

    async fn partition_command(&self, endpoint: &str) -> Result<(), Error> {
        let url = self.api_url(endpoint)?;
        let body = PartitionCommand {
            partition: self.partition(),
        };
        info!(command = endpoint, partition = body.partition, "sending panel command");
        self.send_post_unit(url, &body, true).await
    }
}
