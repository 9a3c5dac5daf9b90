use std::fmt;
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde_json::{Map, Value, json};

use crate::adapters::charger::{Charger, SiteRef};
use crate::adapters::error::EaseeError;
use crate::adapters::transport::{ApiResponse, Transport, TransportError};
use crate::domain::record::{DecodeError, Record, into_object};

#[derive(Clone)]
pub struct CircuitHandle {
    site_id: i64,
    circuit_id: i64,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for CircuitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitHandle")
            .field("site_id", &self.site_id)
            .field("circuit_id", &self.circuit_id)
            .finish_non_exhaustive()
    }
}

impl CircuitHandle {
    pub fn new(site_id: i64, circuit_id: i64, transport: Arc<dyn Transport>) -> Self {
        Self {
            site_id,
            circuit_id,
            transport,
        }
    }

    pub fn site_id(&self) -> i64 {
        self.site_id
    }

    pub fn circuit_id(&self) -> i64 {
        self.circuit_id
    }

    pub async fn set_dynamic_current(
        &self,
        p1: u32,
        p2: Option<u32>,
        p3: Option<u32>,
    ) -> Result<ApiResponse, TransportError> {
        self.post_phase_currents("dynamicCircuitCurrent", p1, p2, p3)
            .await
    }

    pub async fn set_max_current(
        &self,
        p1: u32,
        p2: Option<u32>,
        p3: Option<u32>,
    ) -> Result<ApiResponse, TransportError> {
        self.post_phase_currents("maxCircuitCurrent", p1, p2, p3)
            .await
    }

    pub async fn set_max_offline_current(
        &self,
        p1: u32,
        p2: Option<u32>,
        p3: Option<u32>,
    ) -> Result<ApiResponse, TransportError> {
        self.post_phase_currents("offlineMaxCircuitCurrent", p1, p2, p3)
            .await
    }

    pub async fn set_rated_current(&self, fuse_value: u32) -> Result<ApiResponse, TransportError> {
        let path = format!(
            "/api/sites/{}/circuits/{}/rated_current",
            self.site_id, self.circuit_id
        );
        self.transport
            .post(&path, Some(json!({ "ratedCurrentFuseValue": fuse_value })))
            .await
    }

    // Phases left out follow P1.
    async fn post_phase_currents(
        &self,
        prefix: &str,
        p1: u32,
        p2: Option<u32>,
        p3: Option<u32>,
    ) -> Result<ApiResponse, TransportError> {
        let mut body = Map::new();
        body.insert(format!("{prefix}P1"), Value::from(p1));
        body.insert(format!("{prefix}P2"), Value::from(p2.unwrap_or(p1)));
        body.insert(format!("{prefix}P3"), Value::from(p3.unwrap_or(p1)));

        let path = format!(
            "/api/sites/{}/circuits/{}/settings",
            self.site_id, self.circuit_id
        );
        self.transport.post(&path, Some(Value::Object(body))).await
    }
}

#[derive(Debug, Clone)]
pub struct Circuit {
    id: i64,
    name: String,
    fields: Record,
    handle: CircuitHandle,
    chargers: Vec<Charger>,
}

impl Circuit {
    pub fn from_payload(
        payload: Value,
        site: &SiteRef,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, DecodeError> {
        let mut object = into_object(payload)?;
        let id = required_id(&object)?;
        let name = object
            .get("panelName")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingField("panelName"))?
            .to_string();
        let handle = CircuitHandle::new(site.id, id, Arc::clone(&transport));

        let chargers = take_list(&mut object, "chargers")?
            .into_iter()
            .map(|entries| {
                Charger::new(
                    entries,
                    Arc::clone(&transport),
                    Some(site.clone()),
                    Some(handle.clone()),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            name,
            fields: Record::from(object),
            handle,
            chargers,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn chargers(&self) -> &[Charger] {
        &self.chargers
    }

    pub fn handle(&self) -> &CircuitHandle {
        &self.handle
    }

    pub async fn set_dynamic_current(
        &self,
        p1: u32,
        p2: Option<u32>,
        p3: Option<u32>,
    ) -> Result<ApiResponse, TransportError> {
        self.handle.set_dynamic_current(p1, p2, p3).await
    }

    pub async fn set_max_current(
        &self,
        p1: u32,
        p2: Option<u32>,
        p3: Option<u32>,
    ) -> Result<ApiResponse, TransportError> {
        self.handle.set_max_current(p1, p2, p3).await
    }

    pub async fn set_max_offline_current(
        &self,
        p1: u32,
        p2: Option<u32>,
        p3: Option<u32>,
    ) -> Result<ApiResponse, TransportError> {
        self.handle.set_max_offline_current(p1, p2, p3).await
    }

    pub async fn set_rated_current(&self, fuse_value: u32) -> Result<ApiResponse, TransportError> {
        self.handle.set_rated_current(fuse_value).await
    }
}

#[derive(Debug, Clone)]
pub struct Site {
    site: SiteRef,
    fields: Record,
    circuits: Vec<Circuit>,
}

impl Site {
    pub fn from_payload(payload: Value, transport: Arc<dyn Transport>) -> Result<Self, DecodeError> {
        let mut object = into_object(payload)?;
        let site = SiteRef {
            id: required_id(&object)?,
            name: object
                .get("name")
                .and_then(Value::as_str)
                .ok_or(DecodeError::MissingField("name"))?
                .to_string(),
        };

        let circuits = take_list(&mut object, "circuits")?
            .into_iter()
            .map(|circuit| Circuit::from_payload(circuit, &site, Arc::clone(&transport)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            site,
            fields: Record::from(object),
            circuits,
        })
    }

    pub fn id(&self) -> i64 {
        self.site.id
    }

    pub fn name(&self) -> &str {
        &self.site.name
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    pub fn chargers(&self) -> impl Iterator<Item = &Charger> {
        self.circuits.iter().flat_map(|circuit| circuit.chargers())
    }

    pub fn number_of_chargers(&self) -> usize {
        self.circuits
            .iter()
            .map(|circuit| circuit.chargers().len())
            .sum()
    }
}

#[derive(Clone)]
pub struct SiteDirectory {
    transport: Arc<dyn Transport>,
}

impl SiteDirectory {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_site(&self, id: i64) -> Result<Site, EaseeError> {
        let payload: Value = self.transport.get(&format!("/api/sites/{id}")).await?.json()?;
        tracing::debug!(site_id = id, "site fetched");

        Ok(Site::from_payload(payload, Arc::clone(&self.transport))?)
    }

    pub async fn list_sites(&self) -> Result<Vec<Value>, EaseeError> {
        Ok(self.transport.get("/api/sites").await?.json()?)
    }

    pub async fn populate(&self) -> Result<Vec<Site>, EaseeError> {
        let ids = self
            .list_sites()
            .await?
            .iter()
            .map(|summary| {
                summary
                    .get("id")
                    .and_then(Value::as_i64)
                    .ok_or(DecodeError::MissingField("id"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sites = try_join_all(ids.into_iter().map(|id| self.get_site(id))).await?;
        tracing::info!(
            sites = sites.len(),
            chargers = sites.iter().map(Site::number_of_chargers).sum::<usize>(),
            "account populated"
        );

        Ok(sites)
    }

    pub async fn get_active_countries(&self) -> Result<Vec<Value>, EaseeError> {
        Ok(self
            .transport
            .get("/api/resources/countries/active")
            .await?
            .json()?)
    }

    pub async fn get_currencies(&self) -> Result<Vec<Value>, EaseeError> {
        Ok(self.transport.get("/api/resources/currencies").await?.json()?)
    }
}

fn required_id(object: &Map<String, Value>) -> Result<i64, DecodeError> {
    object
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(DecodeError::MissingField("id"))
}

fn take_list(object: &mut Map<String, Value>, key: &str) -> Result<Vec<Value>, DecodeError> {
    match object.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DecodeError::InvalidPayloadType),
    }
}
