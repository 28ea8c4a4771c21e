use ioconn::{Addr, Close, Conn, FileAddr, NetConn, closer_fn, deadline::is_timeout};
use std::{
    io::{self, BufRead, BufReader, Cursor, Read, Write},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

/// Minimal line protocol, written against the connection abstraction only.
fn answer_greeting(conn: &mut impl NetConn) -> io::Result<String> {
    let mut line = String::new();
    BufReader::new(&mut *conn).read_line(&mut line)?;
    let peer = conn
        .remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_owned());
    write!(conn, "hello {peer}, you said {}", line.trim_end())?;
    conn.flush()?;
    Ok(line)
}

#[test]
fn test_read_hello_from_memory_then_close() {
    let mut conn = Conn::new(
        Cursor::new(b"hello".to_vec()),
        io::sink(),
        closer_fn(|| Ok(())),
    );

    let mut buf = [0u8; 5];
    let n = conn.read(&mut buf).unwrap();
    assert_eq!(n, 5);
    assert_eq!(&buf[..n], b"hello");
    conn.close().unwrap();
}

#[test]
fn test_conn_used_as_net_conn() {
    let closed = Arc::new(AtomicUsize::new(0));
    let closer = {
        let closed = closed.clone();
        closer_fn(move || {
            closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    };

    let mut conn = Conn::new(Cursor::new(b"ping\n".to_vec()), Vec::new(), closer)
        .with_local_addr(Addr::new("memory", "server"))
        .with_remote_addr(Addr::new("memory", "client"));
    conn.set_deadline(Some(Instant::now() + Duration::from_secs(30)))
        .unwrap();

    let line = answer_greeting(&mut conn).unwrap();
    assert_eq!(line, "ping\n");
    assert_eq!(conn.writer(), b"hello client, you said ping");

    Close::close(&mut conn).unwrap();
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_net_conn_trait_objects() {
    let mut conns: Vec<Box<dyn NetConn>> = vec![
        Box::new(
            Conn::new(Cursor::new(b"a\n".to_vec()), Vec::new(), closer_fn(|| Ok(())))
                .with_remote_addr(FileAddr::new("/tmp/a")),
        ),
        Box::new(Conn::new(
            Cursor::new(b"b\n".to_vec()),
            io::sink(),
            closer_fn(|| Ok(())),
        )),
    ];

    for conn in &mut conns {
        answer_greeting(conn).unwrap();
    }
    assert_eq!(
        conns[0].remote_addr().map(|addr| addr.network().to_owned()),
        Some("file".to_owned())
    );
    assert!(conns[1].remote_addr().is_none());
}

#[test]
fn test_elapsed_deadline_stops_protocol() {
    let mut conn = Conn::new(
        Cursor::new(b"ping\n".to_vec()),
        Vec::new(),
        closer_fn(|| Ok(())),
    );
    let deadline = Instant::now();
    std::thread::sleep(Duration::from_millis(2));
    conn.set_deadline(Some(deadline)).unwrap();

    let err = answer_greeting(&mut conn).unwrap_err();
    assert!(is_timeout(&err));
    assert_eq!(conn.reader().position(), 0);
    assert!(conn.writer().is_empty());
}

#[tokio::test]
async fn test_async_conn_over_duplex() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let (client, mut server) = tokio::io::duplex(64);
    let (reader, writer) = tokio::io::split(client);
    let mut conn = Conn::new(reader, writer, closer_fn(|| Ok(())))
        .with_remote_addr(Addr::new("duplex", "server"))
        .with_read_deadline(Instant::now() + Duration::from_secs(30))
        .with_write_deadline(Instant::now() + Duration::from_secs(30));

    conn.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    server.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ping");

    server.write_all(b"pong").await.unwrap();
    conn.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"pong");

    conn.shutdown().await.unwrap();
    assert_eq!(server.read(&mut buf).await.unwrap(), 0);
    conn.close().unwrap();
}
