//! Captured command output used by extractor and engine tests.

pub const ENUMERATION_EN: &str = "
Node,Description,GUID,MACAddress,Name,NetConnectionID,NetConnectionStatus
DESKTOP-1,Intel(R) Ethernet Connection I219-V,{6F1D7A3E-0001},00:11:22:33:44:55,Intel(R) Ethernet Connection I219-V,Ethernet,2
DESKTOP-1,Intel(R) Wi-Fi 6 AX201 160MHz,{9A2B0000-0002},AA:BB:CC:DD:EE:FF,Intel(R) Wi-Fi 6 AX201 160MHz,WLAN,7
DESKTOP-1,VirtualBox Host-Only Ethernet Adapter,{C0FFEE00-0003},0A:00:27:00:00:05,VirtualBox Host-Only Ethernet Adapter,,4
DESKTOP-1,,{DEAD0000-0004},,WAN Miniport (IP),Bogus,2
";

pub const ENUMERATION_ZH: &str = "
Node,Description,GUID,MACAddress,Name,NetConnectionID,NetConnectionStatus
DESKTOP-2,Realtek PCIe GbE Family Controller,{11110000-0001},00:11:22:33:44:66,Realtek PCIe GbE Family Controller,以太网,2
DESKTOP-2,Intel(R) Wi-Fi 6 AX201 160MHz,{22220000-0002},AA:BB:CC:DD:EE:00,Intel(R) Wi-Fi 6 AX201 160MHz,WLAN,7
";

pub const IPV4_CONFIG_EN: &str = "
Configuration for interface \"Ethernet\"
    DHCP enabled:                         No
    IP Address:                           192.168.1.20
    Subnet Prefix:                        192.168.1.0/24 (mask 255.255.255.0)
    IP Address:                           10.0.0.5
    Subnet Prefix:                        10.0.0.0/8 (mask 255.0.0.0)
    Default Gateway:                      192.168.1.1
    Gateway Metric:                       256
    InterfaceMetric:                      25
    Statically Configured DNS Servers:    8.8.8.8
                                          1.1.1.1
    Register with which suffix:           Primary only
    Statically Configured WINS Servers:   None
";

pub const IPV4_CONFIG_ZH: &str = "
接口 \"以太网\" 的配置
    DHCP 已启用:                          是
    IP 地址:                           192.168.31.100
    子网前缀:                        192.168.31.0/24 (掩码 255.255.255.0)
    默认网关:                         192.168.31.1
    网关跃点数:                       0
    InterfaceMetric:                      25
    通过 DHCP 配置的 DNS 服务器:  192.168.31.1
                                          114.114.114.114
    用哪个前缀注册:                   只是主要
    通过 DHCP 配置的 WINS 服务器:  无
";

pub const FULL_DETAIL_EN: &str = "
Windows IP Configuration

   Host Name . . . . . . . . . . . . : DESKTOP-1
   Primary Dns Suffix  . . . . . . . :
   Node Type . . . . . . . . . . . . : Hybrid
   IP Routing Enabled. . . . . . . . : No

Ethernet adapter Ethernet:

   Connection-specific DNS Suffix  . :
   Description . . . . . . . . . . . : Intel(R) Ethernet Connection I219-V
   Physical Address. . . . . . . . . : 00-11-22-33-44-55
   DHCP Enabled. . . . . . . . . . . : No
   Autoconfiguration Enabled . . . . : Yes
   IPv6 Address. . . . . . . . . . . : 2001:db8::20(Preferred)
   Temporary IPv6 Address. . . . . . : 2001:db8::abcd(Preferred)
   Link-local IPv6 Address . . . . . : fe80::1c2d:3e4f:5a6b:7c8d%12(Preferred)
   IPv4 Address. . . . . . . . . . . : 192.168.1.20(Preferred)
   Subnet Mask . . . . . . . . . . . : 255.255.255.0
   IPv4 Address. . . . . . . . . . . : 10.0.0.5(Preferred)
   Subnet Mask . . . . . . . . . . . : 255.0.0.0
   Default Gateway . . . . . . . . . : fe80::1%12
                                       192.168.1.1
   DHCPv6 IAID . . . . . . . . . . . : 100000000
   DNS Servers . . . . . . . . . . . : 8.8.8.8
                                       1.1.1.1
                                       8.8.8.8
   NetBIOS over Tcpip. . . . . . . . : Enabled

Ethernet adapter Ethernet 2:

   Media State . . . . . . . . . . . : Media disconnected
   Description . . . . . . . . . . . : Realtek USB GbE Family Controller
   Physical Address. . . . . . . . . : 00-E0-4C-68-00-01
   DHCP Enabled. . . . . . . . . . . : Yes
   Autoconfiguration Enabled . . . . : Yes

Wireless LAN adapter WLAN:

   Connection-specific DNS Suffix  . : lan
   Description . . . . . . . . . . . : Intel(R) Wi-Fi 6 AX201 160MHz
   Physical Address. . . . . . . . . : AA-BB-CC-DD-EE-FF
   DHCP Enabled. . . . . . . . . . . : Yes
   Autoconfiguration Enabled . . . . : Yes
   IPv4 Address. . . . . . . . . . . : 192.168.0.105(Preferred)
   Subnet Mask . . . . . . . . . . . : 255.255.255.0
   Default Gateway . . . . . . . . . : 192.168.0.1
   DNS Servers . . . . . . . . . . . : 192.168.0.1
   NetBIOS over Tcpip. . . . . . . . : Enabled
";

pub const FULL_DETAIL_ZH: &str = "
Windows IP 配置

   主机名  . . . . . . . . . . . . . : DESKTOP-2
   节点类型  . . . . . . . . . . . . : 混合

以太网适配器 以太网:

   连接特定的 DNS 后缀 . . . . . . . :
   描述. . . . . . . . . . . . . . . : Realtek PCIe GbE Family Controller
   物理地址. . . . . . . . . . . . . : 00-11-22-33-44-66
   DHCP 已启用 . . . . . . . . . . . : 是
   自动配置已启用. . . . . . . . . . : 是
   本地链接 IPv6 地址. . . . . . . . : fe80::5d1e:2c3b:4a59:6b7c%7(首选)
   IPv4 地址 . . . . . . . . . . . . : 192.168.31.100(首选)
   子网掩码  . . . . . . . . . . . . : 255.255.255.0
   获得租约的时间  . . . . . . . . . : 2024年3月1日 9:00:00
   租约过期的时间  . . . . . . . . . : 2024年3月2日 9:00:00
   默认网关. . . . . . . . . . . . . : 192.168.31.1
   DHCP 服务器 . . . . . . . . . . . : 192.168.31.1
   DNS 服务器  . . . . . . . . . . . : 192.168.31.1
                                       114.114.114.114
   TCPIP 上的 NetBIOS  . . . . . . . : 已启用

无线局域网适配器 WLAN:

   媒体状态  . . . . . . . . . . . . : 媒体已断开连接
   描述. . . . . . . . . . . . . . . : Intel(R) Wi-Fi 6 AX201 160MHz
";

pub const DNS_EN: &str = "
Configuration for interface \"Ethernet\"
    Statically Configured DNS Servers:    9.9.9.9
                                          8.8.8.8
    Register with which suffix:           Primary only
";

pub const SPEED_TABLE: &str = "
Node,Name,Speed
DESKTOP-1,Intel(R) Ethernet Connection I219-V,1000000000
DESKTOP-1,Intel(R) Wi-Fi 6 AX201 160MHz,9223372036854775807
DESKTOP-1,Realtek USB GbE Family Controller,100000000
";

pub const WLAN_EN: &str = "
There is 1 interface on the system:

    Name                   : WLAN
    Description            : Intel(R) Wi-Fi 6 AX201 160MHz
    GUID                   : 9a2b0000-0002
    Physical address       : aa:bb:cc:dd:ee:ff
    State                  : connected
    SSID                   : HomeNet
    Radio type             : 802.11ax
    Receive rate (Mbps)    : 1201
    Transmit rate (Mbps)   : 960.5
    Signal                 : 92%
";

pub const WLAN_ZH: &str = "
系统上有 1 个接口:

    名称                   : WLAN
    描述                   : Intel(R) Wi-Fi 6 AX201 160MHz
    状态                   : 已连接
    接收速率(Mbps)         : 866.7
    传输速率 (Mbps)        : 866.7
";

pub const INTERFACES_EN: &str = "
Admin State    State          Type             Interface Name
-------------------------------------------------------------------------
Enabled        Connected      Dedicated        Ethernet
Enabled        Disconnected   Dedicated        Ethernet 2
Disabled       Disconnected   Dedicated        VirtualBox Host-Only Network
Enabled        Connected      Dedicated        WLAN
";

pub const INTERFACES_ZH: &str = "
管理员状态     状态           类型             接口名称
-------------------------------------------------------------------------
已启用            已连接            专用               以太网
已禁用            已断开连接        专用               以太网 2
";
