use bytes::Bytes;
use jhttp::files::ContentCache;

#[tokio::test]
async fn test_cache_starts_empty() {
    let cache = ContentCache::new();

    assert!(cache.is_empty().await);
    assert_eq!(cache.get("/index.html").await, None);
}

#[tokio::test]
async fn test_cache_put_then_get() {
    let cache = ContentCache::new();
    cache.put("/a.html", Bytes::from_static(b"aaa")).await;

    assert_eq!(cache.get("/a.html").await, Some(Bytes::from_static(b"aaa")));
    assert_eq!(cache.len().await, 1);
    assert_eq!(cache.total_bytes().await, 3);
}

#[tokio::test]
async fn test_cache_first_writer_wins() {
    let cache = ContentCache::new();

    let first = cache.put("/a.html", Bytes::from_static(b"first")).await;
    let second = cache.put("/a.html", Bytes::from_static(b"second")).await;

    assert_eq!(first, Bytes::from_static(b"first"));
    assert_eq!(second, Bytes::from_static(b"first"));
    assert_eq!(cache.get("/a.html").await, Some(Bytes::from_static(b"first")));
}

#[tokio::test]
async fn test_cache_clones_share_entries() {
    let cache = ContentCache::new();
    let other = cache.clone();

    other.put("/b.css", Bytes::from_static(b"body{}")).await;

    assert_eq!(cache.get("/b.css").await, Some(Bytes::from_static(b"body{}")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cache_concurrent_inserts_agree() {
    let cache = ContentCache::new();

    let mut tasks = Vec::new();
    for i in 0..32u8 {
        let cache = cache.clone();
        tasks.push(tokio::spawn(async move {
            let payload = Bytes::from(vec![i; 1024]);
            cache.put("/shared.bin", payload).await
        }));
    }

    let mut winners = Vec::new();
    for task in tasks {
        winners.push(task.await.unwrap());
    }

    let cached = cache.get("/shared.bin").await.unwrap();
    assert_eq!(cached.len(), 1024);
    assert!(cached.iter().all(|b| *b == cached[0]));
    assert!(winners.iter().all(|w| *w == cached));
    assert_eq!(cache.len().await, 1);
}
