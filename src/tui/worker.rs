// Request worker
//
// Runs every Command the UI produces on its own tokio task and posts the
// Reply back to the event loop. Requests never block rendering, and
// several may be in flight at once; list tickets sort out the ordering.

use crate::api::AdminClient;
use crate::crud::command::{execute, Command, Reply};
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct Worker {
    client: AdminClient,
    tx: mpsc::Sender<Reply>,
}

impl Worker {
    pub fn new(client: AdminClient, tx: mpsc::Sender<Reply>) -> Self {
        Self { client, tx }
    }

    /// Spawn the command; its reply arrives on the channel
    pub fn dispatch(&self, command: Command) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let reply = execute(&client, command).await;
            if tx.send(reply).await.is_err() {
                tracing::debug!("reply channel closed, dropping reply");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::forms::Lookup;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_dispatched_command_replies_on_channel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/policy-types/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "policy_types": [{"value": "ethics", "label": "Publication ethics"}]
            })))
            .mount(&server)
            .await;

        let config = Config {
            base_url: format!("{}/", server.uri()),
            ..Config::default()
        };
        let (tx, mut rx) = mpsc::channel(4);
        let worker = Worker::new(AdminClient::new(&config).unwrap(), tx);

        worker.dispatch(Command::Lookup {
            lookup: Lookup::PolicyTypes,
            journal: None,
        });

        let reply = rx.recv().await.unwrap();
        assert!(matches!(
            reply,
            Reply::Lookup {
                lookup: Lookup::PolicyTypes,
                result: Ok(_),
                ..
            }
        ));
    }
}
