use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use crate::{
    error::Result,
    models::claims::{PlayerClaims, Provider},
};

/// The host page for hosted-file playback.
///
/// The video element sources the streaming gateway with no query parameters —
/// the gateway re-reads the same session cookie. The inline script is a dumb
/// relay: player events go up the presence socket, commands and prompt view
/// state come down. The context-menu and key-combo suppression are UX
/// friction only, not a security boundary.
const HOSTED_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <meta name="robots" content="noindex,nofollow" />
  <title>Player</title>
  <style>
    html,body{height:100%;margin:0;background:#000}
    .wrap{height:100%;display:flex;align-items:center;justify-content:center}
    video{width:100%;height:100%;background:#000}
    #overlay{position:fixed;inset:0;display:none;align-items:center;justify-content:center;
      flex-direction:column;background:rgba(0,0,0,.85);color:#fff;font-family:sans-serif;z-index:10}
    #overlay.active{display:flex}
    #overlay button{margin-top:16px;padding:12px 32px;font-size:16px;cursor:pointer}
  </style>
</head>
<body>
  <div class="wrap">
    <video id="player" controls playsinline webkit-playsinline
      controlslist="nodownload" disablepictureinpicture
      src="/api/player/stream"></video>
  </div>
  <div id="overlay">
    <p id="overlay-text">Are you still watching?</p>
    <button id="overlay-ack" type="button">I'm here</button>
  </div>
  <script>
    (function () {
      var video = document.getElementById('player');
      var overlay = document.getElementById('overlay');
      var text = document.getElementById('overlay-text');
      var proto = location.protocol === 'https:' ? 'wss' : 'ws';
      var ws = new WebSocket(proto + '://' + location.host + '/api/player/presence');

      function relay(state) {
        if (ws.readyState === WebSocket.OPEN) {
          ws.send(JSON.stringify({ type: 'PLAYER_STATE', state: state }));
        }
      }

      video.addEventListener('playing', function () { relay('playing'); });
      video.addEventListener('pause', function () { relay('paused'); });
      video.addEventListener('ended', function () { relay('ended'); });

      ws.addEventListener('message', function (ev) {
        var msg;
        try { msg = JSON.parse(ev.data); } catch (e) { return; }
        if (msg.type === 'PARENT_COMMAND') {
          if (msg.command === 'pause') video.pause();
          else if (msg.command === 'play') video.play();
        } else if (msg.type === 'PRESENCE_PROMPT') {
          overlay.className = 'active';
          text.textContent = msg.locked
            ? 'Playback is locked. Confirm you are here to continue.'
            : 'Are you still watching? ' + msg.countdown + 's';
        } else if (msg.type === 'PRESENCE_CLEAR') {
          overlay.className = '';
        }
      });

      document.getElementById('overlay-ack').addEventListener('click', function () {
        if (ws.readyState === WebSocket.OPEN) {
          ws.send(JSON.stringify({ type: 'PRESENCE_ACK' }));
        }
      });

      document.addEventListener('contextmenu', function (ev) { ev.preventDefault(); });
      document.addEventListener('keydown', function (ev) {
        if ((ev.ctrlKey || ev.metaKey) && ['s', 'p', 'u'].indexOf(ev.key.toLowerCase()) !== -1) {
          ev.preventDefault();
        }
      });
    })();
  </script>
</body>
</html>"#;

/// The host page for external-embed playback: a sandboxed third-party
/// iframe, never proxied through the gateway.
const EMBED_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <meta name="robots" content="noindex,nofollow" />
  <title>Player</title>
  <style>
    html,body{height:100%;margin:0;background:#000}
    iframe{width:100%;height:100%;border:0}
  </style>
</head>
<body>
  <iframe src="__EMBED_SRC__"
    sandbox="allow-scripts allow-same-origin allow-presentation"
    allow="encrypted-media; fullscreen" allowfullscreen
    referrerpolicy="no-referrer"></iframe>
  <script>
    document.addEventListener('contextmenu', function (ev) { ev.preventDefault(); });
  </script>
</body>
</html>"#;

fn embed_page(reference: &str) -> String {
    // reference charset is validated at issue time, safe to interpolate
    let src = format!(
        "https://www.youtube-nocookie.com/embed/{}?rel=0&modestbranding=1",
        reference
    );
    EMBED_PAGE.replace("__EMBED_SRC__", &src)
}

/// Renders the playback page for the session's provider family.
///
/// Dispatches once on the provider sum type: hosted files get the native
/// player plus the presence relay, external embeds get the sandboxed iframe.
pub async fn render_player(Extension(claims): Extension<PlayerClaims>) -> Result<Response> {
    tracing::info!(
        "📺 Render playback page - provider: {}, lesson: {}",
        claims.provider.as_str(),
        claims.lesson_id
    );

    let page = match claims.provider {
        Provider::HostedFile => HOSTED_PAGE.to_string(),
        Provider::ExternalEmbed => embed_page(&claims.reference),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
            (header::REFERRER_POLICY, "no-referrer"),
            (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
        ],
        page,
    )
        .into_response())
}
