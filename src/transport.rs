use embassy_net::{
    dns::DnsQueryType,
    tcp::{ConnectError, TcpSocket},
    Stack,
};
use embassy_time::Duration;

use solar_weather_station::constants::SOCKET_TIMEOUT_SECS;

#[derive(Debug)]
pub enum Error {
    DNSLookupFailed,
    #[allow(dead_code)]
    SocketConnectionError(ConnectError),
}

/// Opens a plain TCP connection to the broker. `hostname` may be an IP literal.
pub async fn connect<'a>(
    stack: Stack<'static>,
    rx_buffer: &'a mut [u8],
    tx_buffer: &'a mut [u8],
    hostname: &str,
    port: u16,
) -> Result<TcpSocket<'a>, Error> {
    let mut socket = TcpSocket::new(stack, rx_buffer, tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)));

    let addr = stack
        .dns_query(hostname, DnsQueryType::A)
        .await
        .map_err(|_| Error::DNSLookupFailed)?
        .first()
        .copied()
        .ok_or(Error::DNSLookupFailed)?;

    log::info!("Connecting TCP socket to {}:{}", hostname, port);
    socket
        .connect((addr, port))
        .await
        .map_err(Error::SocketConnectionError)?;
    log::info!("TCP connected");

    Ok(socket)
}
