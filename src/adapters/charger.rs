use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::adapters::error::EaseeError;
use crate::adapters::site::CircuitHandle;
use crate::adapters::transport::{ApiResponse, Transport};
use crate::domain::record::{DecodeError, Record};
use crate::domain::session::sessions_newest_first;
use crate::domain::{AccessLevel, ChargerConfig, ChargerSchedule, ChargerSession, ChargerState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRef {
    pub id: i64,
    pub name: String,
}

#[derive(Clone)]
pub struct Charger {
    id: String,
    name: String,
    fields: Record,
    site: Option<SiteRef>,
    circuit: Option<CircuitHandle>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Charger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Charger")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("site", &self.site)
            .field("circuit", &self.circuit)
            .finish_non_exhaustive()
    }
}

impl Charger {
    pub fn new(
        entries: Value,
        transport: Arc<dyn Transport>,
        site: Option<SiteRef>,
        circuit: Option<CircuitHandle>,
    ) -> Result<Self, DecodeError> {
        let fields = Record::from_value(entries)?;
        let id = fields
            .get_str("id")
            .ok_or(DecodeError::MissingField("id"))?
            .to_string();
        let name = fields
            .get_str("name")
            .ok_or(DecodeError::MissingField("name"))?
            .to_string();

        Ok(Self {
            id,
            name,
            fields,
            site,
            circuit,
            transport,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn site(&self) -> Option<&SiteRef> {
        self.site.as_ref()
    }

    pub fn circuit(&self) -> Option<&CircuitHandle> {
        self.circuit.as_ref()
    }

    pub async fn get_consumption_between_dates(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<f64, EaseeError> {
        let path = format!(
            "/api/sessions/charger/{}/total/{}/{}",
            self.id,
            path_datetime(&from),
            path_datetime(&to)
        );
        let response = self.transport.get(&path).await?;
        let text = response.text().trim();

        text.parse::<f64>()
            .map_err(|_| EaseeError::InvalidConsumption(text.to_string()))
    }

    pub async fn get_sessions_between_dates(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ChargerSession>, EaseeError> {
        let path = format!(
            "/api/sessions/charger/{}/sessions/{}/{}",
            self.id,
            path_datetime(&from),
            path_datetime(&to)
        );
        let payload: Value = self.transport.get(&path).await?.json()?;

        Ok(sessions_newest_first(payload)?)
    }

    pub async fn get_config(&self, raw: bool) -> Result<ChargerConfig, EaseeError> {
        let payload: Value = self.transport.get(&self.path("config")).await?.json()?;
        Ok(ChargerConfig::from_payload(payload, raw)?)
    }

    pub async fn get_state(&self, raw: bool) -> Result<ChargerState, EaseeError> {
        let payload: Value = self.transport.get(&self.path("state")).await?.json()?;
        Ok(ChargerState::from_payload(payload, raw)?)
    }

    pub async fn start(&self) -> Result<ApiResponse, EaseeError> {
        self.command("start_charging").await
    }

    pub async fn pause(&self) -> Result<ApiResponse, EaseeError> {
        self.command("pause_charging").await
    }

    pub async fn resume(&self) -> Result<ApiResponse, EaseeError> {
        self.command("resume_charging").await
    }

    pub async fn stop(&self) -> Result<ApiResponse, EaseeError> {
        self.command("stop_charging").await
    }

    pub async fn toggle(&self) -> Result<ApiResponse, EaseeError> {
        self.command("toggle_charging").await
    }

    pub async fn reboot(&self) -> Result<ApiResponse, EaseeError> {
        self.command("reboot").await
    }

    pub async fn update_firmware(&self) -> Result<ApiResponse, EaseeError> {
        self.command("update_firmware").await
    }

    pub async fn override_schedule(&self) -> Result<ApiResponse, EaseeError> {
        self.command("override_schedule").await
    }

    /// `None` when the cloud has no plan for this charger. Every other
    /// failure, including other statuses, is returned as an error.
    pub async fn get_basic_charge_plan(&self) -> Result<Option<ChargerSchedule>, EaseeError> {
        let response = match self.transport.get(&self.path("basic_charge_plan")).await {
            Ok(response) => response,
            Err(error) if error.is_not_found() => {
                tracing::debug!(charger_id = %self.id, "no scheduled charge plan");
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };

        let plan: Value = response.json()?;
        tracing::debug!(charger_id = %self.id, plan = %plan, "basic charge plan fetched");

        Ok(Some(ChargerSchedule::from_payload(plan)?))
    }

    pub async fn set_basic_charge_plan(
        &self,
        id: i64,
        charge_start_time: impl fmt::Display,
        charge_stop_time: impl fmt::Display,
        repeat: bool,
    ) -> Result<ApiResponse, EaseeError> {
        let body = json!({
            "id": id,
            "chargeStartTime": charge_start_time.to_string(),
            "chargeStopTime": charge_stop_time.to_string(),
            "repeat": repeat,
        });

        Ok(self
            .transport
            .post(&self.path("basic_charge_plan"), Some(body))
            .await?)
    }

    pub async fn delete_basic_charge_plan(&self) -> Result<ApiResponse, EaseeError> {
        Ok(self.transport.delete(&self.path("basic_charge_plan")).await?)
    }

    pub async fn enable_charger(&self, enable: bool) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "enabled": enable })).await
    }

    pub async fn enable_idle_current(&self, enable: bool) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "enableIdleCurrent": enable })).await
    }

    pub async fn limit_to_single_phase_charging(
        &self,
        enable: bool,
    ) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "limitToSinglePhaseCharging": enable }))
            .await
    }

    /// 1 = always single phase, 2 = auto, 3 = always three phase. Other
    /// values are sent as-is and left for the cloud to reject.
    pub async fn set_phase_mode(&self, mode: i64) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "phaseMode": mode })).await
    }

    pub async fn lock_cable_permanently(&self, enable: bool) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "lockCablePermanently": enable })).await
    }

    pub async fn enable_smart_button(&self, enable: bool) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "smartButtonEnabled": enable })).await
    }

    pub async fn smart_charging(&self, enable: bool) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "smartCharging": enable })).await
    }

    pub async fn set_dynamic_charger_current(
        &self,
        current: u32,
    ) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "dynamicChargerCurrent": current }))
            .await
    }

    pub async fn set_max_charger_current(&self, current: u32) -> Result<ApiResponse, EaseeError> {
        self.settings(json!({ "maxChargerCurrent": current })).await
    }

    /// Accepts an [`AccessLevel`], its numeric code or its symbolic name.
    /// Unknown inputs fail before anything is sent.
    pub async fn set_access<A>(&self, access: A) -> Result<ApiResponse, EaseeError>
    where
        A: TryInto<AccessLevel>,
        EaseeError: From<A::Error>,
    {
        let level = access.try_into()?;

        Ok(self
            .transport
            .put(&self.path("access"), Some(Value::from(level.code())))
            .await?)
    }

    pub async fn delete_access(&self) -> Result<ApiResponse, EaseeError> {
        Ok(self.transport.delete(&self.path("access")).await?)
    }

    pub async fn set_dynamic_charger_circuit_current(
        &self,
        current_p1: u32,
        current_p2: Option<u32>,
        current_p3: Option<u32>,
    ) -> Result<Option<ApiResponse>, EaseeError> {
        let Some(circuit) = &self.circuit else {
            tracing::info!(
                charger_id = %self.id,
                "circuit must be initialized for dynamic current to be set"
            );
            return Ok(None);
        };

        Ok(Some(
            circuit
                .set_dynamic_current(current_p1, current_p2, current_p3)
                .await?,
        ))
    }

    pub async fn set_max_charger_circuit_current(
        &self,
        current_p1: u32,
        current_p2: Option<u32>,
        current_p3: Option<u32>,
    ) -> Result<Option<ApiResponse>, EaseeError> {
        let Some(circuit) = &self.circuit else {
            tracing::info!(
                charger_id = %self.id,
                "circuit must be initialized for max current to be set"
            );
            return Ok(None);
        };

        Ok(Some(
            circuit
                .set_max_current(current_p1, current_p2, current_p3)
                .await?,
        ))
    }

    pub async fn set_max_offline_charger_circuit_current(
        &self,
        current_p1: u32,
        current_p2: Option<u32>,
        current_p3: Option<u32>,
    ) -> Result<Option<ApiResponse>, EaseeError> {
        let Some(circuit) = &self.circuit else {
            tracing::info!(
                charger_id = %self.id,
                "circuit must be initialized for offline current to be set"
            );
            return Ok(None);
        };

        Ok(Some(
            circuit
                .set_max_offline_current(current_p1, current_p2, current_p3)
                .await?,
        ))
    }

    fn path(&self, suffix: &str) -> String {
        format!("/api/chargers/{}/{suffix}", self.id)
    }

    async fn command(&self, command: &str) -> Result<ApiResponse, EaseeError> {
        let path = self.path(&format!("commands/{command}"));
        Ok(self.transport.post(&path, None).await?)
    }

    async fn settings(&self, body: Value) -> Result<ApiResponse, EaseeError> {
        Ok(self.transport.post(&self.path("settings"), Some(body)).await?)
    }
}

fn path_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
