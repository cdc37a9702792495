mod access_gate;
pub(crate) use access_gate::*;

mod sftp_client;
pub(crate) use sftp_client::*;

mod task_dispatcher;
pub(crate) use task_dispatcher::*;
