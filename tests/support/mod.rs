pub mod helpers;
pub mod mock_xray;
