//! gRPC transport adapter.

mod auth_grpc;

/// Generated protocol buffer definitions.
pub mod pb {
    tonic::include_proto!("sso.v1");
}

pub use auth_grpc::AuthGrpcService;
pub use pb::auth_server::AuthServer;
