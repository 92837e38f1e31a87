use reqwest::Response;
use serde::de::DeserializeOwned;
use self::error::ConnectorError;

pub mod catalyst;
pub mod error;
pub mod meraki;


/// Lee el cuerpo completo y lo decodifica; un cuerpo malformado es `ConnectorError::Json`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ConnectorError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
